use super::{Params, QueryError, QueryString, Value, decode};

/// Bracket-path segment of a parameter name.
///
/// `a[b][]` tokenizes to base name `a` plus `[Key("b"), Next]`.
pub(super) enum Segment {
    /// Named nested key, `[b]`.
    Key(String),
    /// Empty pair `[]`, appends to an implicit list.
    Next,
}

pub(super) fn parse(raw: &str) -> Result<QueryString, QueryError> {
    let mut query = QueryString::new();

    for token in raw.split('&') {
        if token.is_empty() {
            continue;
        }

        let (name, value) = match token.split_once('=') {
            Some((name, value)) => (decode(name), Value::Scalar(decode(value))),
            None => (decode(token), Value::Absent),
        };

        let (base, segments) = tokenize(&name)?;
        fold(query.params_mut().slot(base), &segments, value);
    }

    Ok(query)
}

// ===== Tokenizer =====

/// Split a decoded parameter name into its base name and bracket path.
///
/// # Errors
///
/// Returns [`Err`] for `[` without `]`, a `]` before any `[`, or text
/// between a closing `]` and the next `[`.
pub(super) fn tokenize(name: &str) -> Result<(String, Vec<Segment>), QueryError> {
    let Some(open) = name.find('[') else {
        if name.contains(']') {
            return Err(QueryError::UnbalancedBrackets);
        }
        return Ok((name.to_owned(), Vec::new()));
    };

    let base = &name[..open];
    if base.contains(']') {
        return Err(QueryError::UnbalancedBrackets);
    }

    let mut segments = Vec::new();
    let mut rest = &name[open..];
    while !rest.is_empty() {
        let Some(stripped) = rest.strip_prefix('[') else {
            return Err(QueryError::UnbalancedBrackets);
        };
        let Some(close) = stripped.find(']') else {
            return Err(QueryError::UnbalancedBrackets);
        };
        let segment = &stripped[..close];
        if segment.contains('[') {
            return Err(QueryError::UnbalancedBrackets);
        }
        segments.push(match segment {
            "" => Segment::Next,
            key => Segment::Key(key.to_owned()),
        });
        rest = &stripped[close + 1..];
    }

    Ok((base.to_owned(), segments))
}

// ===== Tree builder =====

/// Fold a bracket path into nested containers under `slot`.
///
/// The cursor walks owned containers only; a slot holding the wrong
/// container shape is overwritten, matching last-write-wins parameter
/// semantics.
fn fold(slot: &mut Value, segments: &[Segment], value: Value) {
    match segments.split_first() {
        None => *slot = value,
        Some((Segment::Next, rest)) => {
            let items = as_list(slot);
            items.push(Value::Absent);
            // slot freshly pushed above
            fold(items.last_mut().unwrap(), rest, value);
        }
        Some((Segment::Key(key), rest)) => {
            let params = as_map(slot);
            fold(params.slot(key.clone()), rest, value);
        }
    }
}

fn as_list(slot: &mut Value) -> &mut Vec<Value> {
    if !matches!(slot, Value::List(_)) {
        *slot = Value::List(Vec::new());
    }
    match slot {
        Value::List(items) => items,
        _ => unreachable!(),
    }
}

fn as_map(slot: &mut Value) -> &mut Params {
    if !matches!(slot, Value::Map(_)) {
        *slot = Value::Map(Params::new());
    }
    match slot {
        Value::Map(params) => params,
        _ => unreachable!(),
    }
}
