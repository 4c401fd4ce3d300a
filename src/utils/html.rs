use ammonia::Builder;

/// Strips every tag from a user-supplied label such as a team name.
///
/// An empty tag whitelist keeps the text and drops the tags, and the content of
/// `<script>`/`<style>` is removed entirely. The result is plain text: the
/// entity escaping ammonia applies on output is undone, so `R&D` stays `R&D`
/// and escaping is left to whatever renders the label. Surrounding whitespace
/// is trimmed.
pub fn clean_label(input: &str) -> String {
    let cleaned = Builder::empty().clean(input).to_string();
    unescape_text(&cleaned).trim().to_string()
}

/// Reverses the escaping html5ever's serializer applies to text nodes.
/// `&amp;` goes last so an escaped entity (`&amp;lt;`) only decodes once.
fn unescape_text(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
