//! Type descriptors
//!
//! Turns source-level type spellings from signature files into JVM binary
//! descriptors, and dotted class names into canonical `/`/`$` names.

/// Canonical class name for a dotted name.
///
/// A `.` after a segment starting with an uppercase letter separates nested
/// classes (`$`); any other `.` separates packages (`/`). Generic arguments
/// are dropped.
///
/// `android.view.View.OnClickListener` becomes `android/view/View$OnClickListener`.
pub fn canonical_class_name(name: &str) -> String {
    let name = erase_generics(name);
    let mut result = String::with_capacity(name.len());
    let mut in_class = starts_uppercase(&name);

    for (index, c) in name.char_indices() {
        if c == '.' {
            result.push(if in_class { '$' } else { '/' });
            in_class = starts_uppercase(&name[index + 1..]);
        } else {
            result.push(c);
        }
    }

    result
}

/// JVM descriptor for a source-level type spelling.
///
/// `int` -> `I`, `java.lang.String[]` -> `[Ljava/lang/String;`,
/// `int...` -> `[I`.
pub fn encode_type(type_name: &str) -> String {
    let erased = erase_generics(type_name.trim());
    let mut base = erased.as_str();
    let mut result = String::new();

    if let Some(stripped) = base.strip_suffix("...") {
        result.push('[');
        base = stripped;
    }

    while let Some(stripped) = base.strip_suffix("[]") {
        result.push('[');
        base = stripped;
    }

    match primitive_code(base) {
        Some(code) => result.push(code),
        None => {
            result.push('L');
            result.push_str(&canonical_class_name(base));
            result.push(';');
        }
    }

    result
}

/// Single-letter code for a primitive type (or `void`)
pub fn primitive_code(name: &str) -> Option<char> {
    match name {
        "byte" => Some('B'),
        "char" => Some('C'),
        "double" => Some('D'),
        "float" => Some('F'),
        "int" => Some('I'),
        "long" => Some('J'),
        "short" => Some('S'),
        "void" => Some('V'),
        "boolean" => Some('Z'),
        _ => None,
    }
}

/// Remove every balanced `<...>` span
fn erase_generics(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut depth = 0usize;

    for c in name.chars() {
        match c {
            '<' => depth += 1,
            '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(c),
            _ => {}
        }
    }

    result
}

fn starts_uppercase(segment: &str) -> bool {
    segment.chars().next().is_some_and(char::is_uppercase)
}
