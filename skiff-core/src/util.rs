use std::fmt;

/// Writes `values` through `f`, inserting `separator` between items that
/// produced output.
pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

const TRUNCATE_AT: usize = 497;

/// Statement text shortened for log lines, cut at a char boundary.
pub struct Truncated<'a>(&'a str);

pub fn truncated(query: &str) -> Truncated<'_> {
    Truncated(query)
}

impl fmt::Display for Truncated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= TRUNCATE_AT {
            return f.write_str(self.0.trim_end());
        }
        let mut end = TRUNCATE_AT;
        while !self.0.is_char_boundary(end) {
            end -= 1;
        }
        write!(f, "{}...", self.0[..end].trim_end())
    }
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        $crate::truncated(&$query)
    };
}
