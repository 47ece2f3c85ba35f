//! Request handlers for the `/pictDB/*` endpoints.
//!
//! The server holds a single [`Db`] handle and serves requests one at a
//! time, so handlers borrow it directly rather than taking a lock.

use std::io::Read;

use tiny_http::{Header, Request, Response};

use crate::db::Db;
use crate::error::PictDbError;
use crate::http::multipart;
use crate::ops::{self, ListMode};
use crate::resolution::Resolution;

const HTML_ERROR_START: &str = "<html><body><p><b>Error: </b>";
const HTML_ERROR_END: &str = "</p></body></html>";

const INDEX_HTML: &str = include_str!("index.html");

/// The route a path resolves to, independent of any live [`Request`].
///
/// Split out of [`dispatch`] so the routing table can be exercised without a
/// `tiny_http::Request`, which has no public constructor outside of the
/// crate's own TCP listener.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    Index,
    List,
    Read,
    Insert,
    Delete,
    NotFound,
}

fn route_for(path: &str) -> Route {
    match path {
        "/" | "/index.html" => Route::Index,
        "/pictDB/list" => Route::List,
        "/pictDB/read" => Route::Read,
        "/pictDB/insert" => Route::Insert,
        "/pictDB/delete" => Route::Delete,
        _ => Route::NotFound,
    }
}

pub fn dispatch(db: &mut Db, request: Request) {
    let url = request.url().to_string();
    let (path, query) = match url.split_once('?') {
        Some((p, q)) => (p, q),
        None => (url.as_str(), ""),
    };

    let result = match route_for(path) {
        Route::Index => handle_index(request),
        Route::List => handle_list(db, request),
        Route::Read => handle_read(db, request, query),
        Route::Insert => handle_insert(db, request),
        Route::Delete => handle_delete(db, request, query),
        Route::NotFound => {
            let response = Response::from_string("not found").with_status_code(404);
            request.respond(response).ok();
            Ok(())
        }
    };

    if let Err(err) = result {
        log::warn!("request to {path} failed: {err}");
    }
}

fn handle_index(request: Request) -> std::io::Result<()> {
    let header = Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap();
    let response = Response::from_string(INDEX_HTML).with_header(header);
    request.respond(response)
}

fn query_param<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

fn send_error(request: Request, err: &PictDbError) -> std::io::Result<()> {
    let body = format!("{HTML_ERROR_START}{err}{HTML_ERROR_END}");
    let header = Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap();
    let response = Response::from_string(body)
        .with_status_code(500)
        .with_header(header);
    request.respond(response)
}

fn handle_list(db: &Db, request: Request) -> std::io::Result<()> {
    match ops::list(db, ListMode::Json) {
        Ok(Some(json)) => {
            let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            let response = Response::from_string(json).with_header(header);
            request.respond(response)
        }
        Ok(None) => unreachable!("ListMode::Json always returns a body"),
        Err(err) => send_error(request, &err),
    }
}

fn handle_read(db: &mut Db, request: Request, query: &str) -> std::io::Result<()> {
    let pict_id = query_param(query, "pict_id").map(str::to_string);
    let res_tag = query_param(query, "res").unwrap_or("orig");

    let (Some(pict_id), Ok(resolution)) = (pict_id, Resolution::parse(res_tag)) else {
        return send_error(request, &PictDbError::Http(format!("missing pict_id or invalid res `{res_tag}`")));
    };

    match ops::read(db, &pict_id, resolution) {
        Ok(bytes) => {
            let header = Header::from_bytes(&b"Content-Type"[..], &b"image/jpeg"[..]).unwrap();
            let response = Response::from_data(bytes).with_header(header);
            request.respond(response)
        }
        Err(err) => send_error(request, &err),
    }
}

fn handle_insert(db: &mut Db, mut request: Request) -> std::io::Result<()> {
    let boundary = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .and_then(|h| h.value.as_str().split("boundary=").nth(1))
        .map(str::to_string);

    let Some(boundary) = boundary else {
        return send_error(request, &PictDbError::Http("missing multipart boundary in Content-Type".to_string()));
    };

    let mut body = Vec::new();
    if request.as_reader().read_to_end(&mut body).is_err() {
        return send_error(request, &PictDbError::Io(std::io::Error::other("read body")));
    }

    let Some((filename, content)) = multipart::extract_file(&body, &boundary) else {
        return send_error(request, &PictDbError::Http("multipart body has no file part".to_string()));
    };

    match ops::insert(db, &filename, &content) {
        Ok(()) => redirect(request),
        Err(err) => send_error(request, &err),
    }
}

fn handle_delete(db: &mut Db, request: Request, query: &str) -> std::io::Result<()> {
    let Some(pict_id) = query_param(query, "pict_id") else {
        return send_error(request, &PictDbError::Http("missing pict_id query parameter".to_string()));
    };

    match ops::delete(db, pict_id) {
        Ok(()) => redirect(request),
        Err(err) => send_error(request, &err),
    }
}

fn redirect(request: Request) -> std::io::Result<()> {
    let header = Header::from_bytes(&b"Location"[..], &b"/index.html"[..]).unwrap();
    let response = Response::from_string("").with_status_code(302).with_header(header);
    request.respond(response)
}

#[cfg(test)]
mod tests {
    use assert2::check as assert;

    use super::*;

    #[test]
    fn index_and_index_html_both_resolve_to_index() {
        assert!(route_for("/") == Route::Index);
        assert!(route_for("/index.html") == Route::Index);
    }

    #[test]
    fn insert_and_delete_redirect_target_resolves() {
        assert!(route_for("/index.html") != Route::NotFound);
    }

    #[test]
    fn pictdb_routes_resolve() {
        assert!(route_for("/pictDB/list") == Route::List);
        assert!(route_for("/pictDB/read") == Route::Read);
        assert!(route_for("/pictDB/insert") == Route::Insert);
        assert!(route_for("/pictDB/delete") == Route::Delete);
    }

    #[test]
    fn unknown_path_is_not_found() {
        assert!(route_for("/whatever") == Route::NotFound);
    }

    #[test]
    fn index_page_embeds_documented_routes() {
        assert!(INDEX_HTML.contains("/pictDB/list"));
        assert!(INDEX_HTML.contains("/pictDB/insert"));
    }
}
