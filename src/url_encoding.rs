use pct_str::{PctStr, InvalidPctString};

// Don't want to return InvalidPctString as error value because then:
// 1. dependency on pct_str,
// 2. worse, InvalidPctString would contain &str and that would be
//    embedded in anyhow::Result down the line and that leads to
//    <`request` escapes the function body>.
// Thus make our own that owns the string.

#[derive(Debug, thiserror::Error)]
#[error("url decoding error: {0}")]
pub struct UrlDecodingError(Box<String>);

impl From<InvalidPctString<&str>> for UrlDecodingError {
    fn from(e: InvalidPctString<&str>) -> Self {
        Self(Box::new(format!("{}", e)))
    }
}

pub fn url_decode(s: &str) -> Result<String, UrlDecodingError> {
    let p = PctStr::new(s)?;
    Ok(p.decode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_url_decode() {
        assert_eq!(url_decode("").unwrap(), "");
        assert_eq!(url_decode("foo/bar").unwrap(), "foo/bar");
        assert_eq!(url_decode("a%20b").unwrap(), "a b");
        assert_eq!(url_decode("Mot%C3%B6rhead").unwrap(), "Motörhead");
        assert!(url_decode("100%").is_err());
        assert!(url_decode("%zz").is_err());
    }
}
