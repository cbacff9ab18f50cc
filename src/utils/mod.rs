pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::{safe_truncate_chars, sanitize_url_filename};
pub use url_utils::{has_pdf_suffix, is_valid_url, normalize_url, pdf_name_from_url, same_authority};
