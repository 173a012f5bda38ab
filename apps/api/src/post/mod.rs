// The post-card domain: input sanitization, markup construction, and the
// /render handlers.

pub mod handlers;
pub mod markup;
pub mod sanitize;
