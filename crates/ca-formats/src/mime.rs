//! Extension based MIME lookup over the `mime_guess` table.
//!
//! Only consulted for extensions the catalog does not know, and for the
//! content type of stored objects. Unknown extensions yield `None` rather
//! than `application/octet-stream` so classification can tell the two apart.

/// Content type used when [`mime_from_name`] has no answer.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Look up the MIME type for a file name, path or bare extension.
///
/// The key is the text after the last `.` of the final path component; a
/// component without a dot is used whole, so `"png"` and `"a/b.png"` both
/// resolve to `image/png`.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
    let key = base.rsplit('.').next().unwrap_or(base);
    if key.is_empty() {
        return None;
    }
    mime_guess::from_ext(key).first_raw()
}

/// Content type for storing `name`, falling back to [`OCTET_STREAM`].
pub fn content_type_for(name: &str) -> &'static str {
    mime_from_name(name).unwrap_or(OCTET_STREAM)
}
