//! Shared helpers.

/// Unwrap an optional, logging a warning and returning if it is missing.
macro_rules! bail {
    ($opt:expr $(,)?) => {
        match $opt {
            Some(val) => val,
            None => {
                log::warn!("[{}:{}] bailed", file!(), line!());
                return
            }
        }
    };
     ($opt:expr, $($arg:tt)+) => {
        match $opt {
            Some(val) => val,
            None => {
                log::warn!("[{}:{}] bailed: {}", file!(), line!(), format_args!($($arg)+));
                return
            }
        }
    };
}

/// Format an integer with `,` as the thousands separator.
pub(crate) fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(256), "256");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(60000), "60,000");
        assert_eq!(thousands(1_111_998), "1,111,998");
    }
}
