/// Parse a page span like "245" or "245-247" into an inclusive 1-indexed
/// (start, end) pair.
///
/// A single page yields `(page, page)`. Returns an error for page 0,
/// malformed numbers, or a reversed range.
pub fn parse_page_span(input: &str) -> Result<(u32, u32), String> {
    let input = input.trim();

    let (start, end) = match input.split_once('-') {
        Some((start_str, end_str)) => {
            let start: u32 = start_str
                .trim()
                .parse()
                .map_err(|_| format!("invalid page number: '{}'", start_str.trim()))?;
            let end: u32 = end_str
                .trim()
                .parse()
                .map_err(|_| format!("invalid page number: '{}'", end_str.trim()))?;
            (start, end)
        }
        None => {
            let page: u32 = input
                .parse()
                .map_err(|_| format!("invalid page number: '{input}'"))?;
            (page, page)
        }
    };

    if start == 0 || end == 0 {
        return Err("page 0 is invalid (pages start at 1)".to_string());
    }
    if end < start {
        return Err(format!("invalid page range: {start}-{end}"));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_page() {
        assert_eq!(parse_page_span("245").unwrap(), (245, 245));
    }

    #[test]
    fn page_range() {
        assert_eq!(parse_page_span("245-247").unwrap(), (245, 247));
    }

    #[test]
    fn whitespace_tolerance() {
        assert_eq!(parse_page_span(" 12 - 14 ").unwrap(), (12, 14));
    }

    #[test]
    fn page_zero_invalid() {
        assert!(parse_page_span("0").unwrap_err().contains("invalid"));
        assert!(parse_page_span("0-3").unwrap_err().contains("invalid"));
    }

    #[test]
    fn reversed_range_invalid() {
        assert!(parse_page_span("7-3").unwrap_err().contains("invalid"));
    }

    #[test]
    fn garbage_invalid() {
        assert!(parse_page_span("abc").is_err());
        assert!(parse_page_span("1-x").is_err());
        assert!(parse_page_span("").is_err());
    }
}
