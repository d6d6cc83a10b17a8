//! Minimal HTML output: escaping, and serialization of the one
//! element kind this crate ever produces, the anchor.

use std::io::Write;

use anyhow::Result;
use kstring::KString;

use crate::myfrom::MyFrom;

fn ks<T>(s: T) -> KString
where KString: MyFrom<T>
{
    KString::myfrom(s)
}

pub fn att<T, U>(key: T, val: U) -> Option<(KString, KString)>
    where KString: MyFrom<T> + MyFrom<U>
{
    Some((ks(key), ks(val)))
}

pub fn opt_att<T, U>(key: T, val: Option<U>) -> Option<(KString, KString)>
    where KString: MyFrom<T> + MyFrom<U>
{
    val.map(|val| (ks(key), ks(val)))
}

/// Collect the values returned by `att` and `opt_att` into an
/// attribute list, dropping the `None`s.
pub fn atts<const N: usize>(
    atts: [Option<(KString, KString)>; N]
) -> Vec<(KString, KString)> {
    atts.into_iter().flatten().collect()
}

pub fn html_escape_into(out: &mut impl Write, s: &str) -> Result<()> {
    for b in s.as_bytes() {
        match b {
            b'&' => out.write_all(b"&amp;")?,
            b'<' => out.write_all(b"&lt;")?,
            b'>' => out.write_all(b"&gt;")?,
            b'"' => out.write_all(b"&quot;")?,
            b'\'' => out.write_all(b"&#39;")?,
            _ => out.write_all(std::slice::from_ref(b))?,
        }
    }
    Ok(())
}

/// An `a` element with its attributes and its text content. The text
/// is kept unescaped; escaping happens on serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub attr: Vec<(KString, KString)>,
    pub text: KString,
}

impl Anchor {
    pub fn new(attr: Vec<(KString, KString)>, text: KString) -> Self {
        Self { attr, text }
    }

    pub fn print_html_fragment(&self, out: &mut impl Write) -> Result<()> {
        out.write_all(b"<a")?;
        for (key, val) in &self.attr {
            out.write_all(b" ")?;
            out.write_all(key.as_bytes())?; // XX no escape ever needed?
            out.write_all(b"=\"")?;
            html_escape_into(out, val)?;
            out.write_all(b"\"")?;
        }
        out.write_all(b">")?;
        html_escape_into(out, &self.text)?;
        out.write_all(b"</a>")?;
        Ok(())
    }

    pub fn to_html_fragment_string(&self) -> Result<String> {
        let mut v = Vec::new();
        self.print_html_fragment(&mut v)?;
        Ok(unsafe {
            // Safe because v was filled from bytes derived from
            // String/str values and byte string literals that were
            // simply concatenated together.
            String::from_utf8_unchecked(v)
        })
    }
}
