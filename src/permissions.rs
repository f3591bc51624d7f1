use axum::http::Method;

/// Records owned by a single user.
pub trait Authored {
    fn author_id(&self) -> i32;
}

/// GET, HEAD and OPTIONS never modify a record.
pub fn is_safe_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD || method == Method::OPTIONS
}

/// Object-level check applied after authentication: anyone may read,
/// only the author may write.
pub fn is_author_or_read_only<R: Authored>(method: &Method, requester_id: i32, record: &R) -> bool {
    is_safe_method(method) || record.author_id() == requester_id
}
