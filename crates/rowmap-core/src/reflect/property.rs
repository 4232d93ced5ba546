/// Converts an accessor method name to its property name.
///
/// `getFirstName` becomes `firstName`, `isActive` becomes `active`, and
/// `getURL` stays `URL` because the second letter is upper case. Returns
/// `None` for names that are not accessors.
pub fn method_to_property(name: &str) -> Option<String> {
    let rest = if let Some(rest) = name.strip_prefix("is") {
        rest
    } else if let Some(rest) = name.strip_prefix("get").or_else(|| name.strip_prefix("set")) {
        rest
    } else {
        return None;
    };

    let mut chars = rest.chars();
    let first = chars.next()?;
    let second = chars.next();

    if second.map_or(true, |second| !second.is_uppercase()) {
        let mut property: String = first.to_lowercase().collect();
        property.push_str(&rest[first.len_utf8()..]);
        Some(property)
    } else {
        Some(rest.to_string())
    }
}

pub fn is_getter(name: &str) -> bool {
    (name.starts_with("get") && name.len() > 3) || (name.starts_with("is") && name.len() > 2)
}

pub fn is_setter(name: &str) -> bool {
    name.starts_with("set") && name.len() > 3
}

/// Names that never become properties.
pub fn is_valid_property_name(name: &str) -> bool {
    !(name.starts_with('$') || name == "serialVersionUID" || name == "class")
}

/// Splits a dotted property path into its first segment and the remainder.
/// Index suffixes such as `items[0]` are stripped from the segment.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    let head = match head.find('[') {
        Some(index) => &head[..index],
        None => head,
    };

    (head, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_names() {
        assert_eq!(method_to_property("getName").as_deref(), Some("name"));
        assert_eq!(method_to_property("isActive").as_deref(), Some("active"));
        assert_eq!(method_to_property("setA").as_deref(), Some("a"));
        assert_eq!(method_to_property("getURL").as_deref(), Some("URL"));
        assert_eq!(method_to_property("toString"), None);
    }

    #[test]
    fn accessor_shapes() {
        assert!(is_getter("getX"));
        assert!(!is_getter("get"));
        assert!(is_getter("isX"));
        assert!(!is_getter("is"));
        assert!(is_setter("setX"));
        assert!(!is_setter("set"));
    }

    #[test]
    fn paths() {
        assert_eq!(split_path("author.name"), ("author", Some("name")));
        assert_eq!(split_path("posts[0].title"), ("posts", Some("title")));
        assert_eq!(split_path("id"), ("id", None));
    }
}
