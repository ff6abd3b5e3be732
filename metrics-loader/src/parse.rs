use crate::MetricsLoadError;

/// Given a string in our metrics format, iterate over keys and values.
pub fn iter_items(s: &str) -> impl Iterator<Item = Result<(&str, &str), MetricsLoadError>> {
    s.lines().enumerate().filter_map(|(idx, line)| {
        let line = strip_comment(line);
        if line.trim().is_empty() {
            None
        } else {
            let mut split = line.split(':');
            match (split.next(), split.next(), split.next()) {
                (Some(key), Some(val), None) if !key.trim().is_empty() => {
                    Some(Ok((key.trim(), val.trim())))
                }
                _ => Some(Err(MetricsLoadError::ParseLineError {
                    line: idx + 1,
                    text: line.to_string(),
                })),
            }
        }
    })
}

fn strip_comment(line: &str) -> &str {
    let line = line.split("//").next().unwrap_or(line);
    line.split('#').next().unwrap_or(line)
}
