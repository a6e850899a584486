use super::HeaderList;

/// Parse a raw header block.
///
/// Lines are CRLF- or LF-separated. A matching line is `Name: Value`
/// where the name runs up to the first `:`, is non-empty and contains
/// no space; the value is the rest of the line with one leading space
/// and trailing line terminators stripped. Anything else is ignored.
pub(super) fn parse(raw: &str) -> HeaderList {
    let mut list = HeaderList::new();

    for line in raw.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.is_empty() || name.contains(' ') {
            continue;
        }

        let value = value.strip_prefix(' ').unwrap_or(value);
        list.put_unchecked(name.to_owned(), value.to_owned());
    }

    list
}
