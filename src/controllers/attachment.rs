const FALLBACK_NAME: &str = "video";
const MAX_NAME_CHARS: usize = 180;

/// Turns a video title into something safe to offer as a download name.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_NAME_CHARS).collect();
    let name = truncated.trim_end_matches([' ', '.', '-', ';']).trim_start();

    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// `Content-Disposition` value for `<title>.mp4`, with an ASCII `filename`
/// and the full UTF-8 name in `filename*`.
pub fn content_disposition(title: &str) -> String {
    let name = format!("{}.mp4", sanitize_title(title));
    let ascii: String = name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(&name)
    )
}
