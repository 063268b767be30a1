//! Syntax highlighting engine
//!
//! Languages are described by static descriptors; a single left-to-right
//! pass classifies every rendered byte of a line. Multi-line comment state
//! enters as a flag from the previous row and leaves as the return value,
//! so the caller can propagate it forward through the row cache.

/// Highlight class assigned to one rendered byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Normal,
    /// Transient search-match overlay
    Match,
    SlComment,
    MlComment,
    Keyword1,
    Keyword2,
    Keyword3,
    String,
    Number,
}

impl Highlight {
    /// SGR code for this class
    pub fn color(self) -> u8 {
        match self {
            Highlight::Normal => 97,
            Highlight::Match => 43,
            Highlight::SlComment | Highlight::MlComment => 36,
            Highlight::Keyword1 => 93,
            Highlight::Keyword2 => 92,
            Highlight::Keyword3 => 36,
            Highlight::String => 91,
            Highlight::Number => 31,
        }
    }
}

/// Enable highlighting of numeric literals
pub const HL_NUMBERS: u8 = 1 << 0;
/// Enable highlighting of string literals
pub const HL_STRINGS: u8 = 1 << 1;

/// A language descriptor
///
/// `patterns` entries starting with a dot match as a file-name suffix,
/// anything else matches as a substring. Keywords with a trailing `|` are
/// type keywords (KEYWORD_2); a leading `#` marks preprocessor keywords
/// (KEYWORD_3).
pub struct Syntax {
    pub name: &'static str,
    pub patterns: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub sl_comment: &'static str,
    pub ml_comment_start: &'static str,
    pub ml_comment_end: &'static str,
    pub flags: u8,
}

/// Built-in language table; the first matching entry wins
pub const LANGUAGES: &[Syntax] = &[
    Syntax {
        name: "c",
        patterns: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        keywords: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else",
            "struct", "union", "typedef", "static", "enum", "case", "const",
            "sizeof", "do", "goto", "extern", "volatile", "register", "inline",
            "int|", "long|", "double|", "float|", "char|", "unsigned|", "signed|",
            "void|", "short|", "size_t|", "uint8_t|", "uint16_t|", "uint32_t|",
            "uint64_t|", "bool|",
            "#include", "#define", "#undef", "#ifdef", "#ifndef", "#if", "#else",
            "#elif", "#endif", "#error", "#pragma",
        ],
        sl_comment: "//",
        ml_comment_start: "/*",
        ml_comment_end: "*/",
        flags: HL_NUMBERS | HL_STRINGS,
    },
    Syntax {
        name: "rust",
        patterns: &[".rs"],
        keywords: &[
            "as", "break", "const", "continue", "crate", "dyn", "else", "extern",
            "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
            "move", "mut", "pub", "ref", "return", "self", "static", "super",
            "trait", "unsafe", "use", "where", "while",
            "bool|", "char|", "str|", "u8|", "u16|", "u32|", "u64|", "usize|",
            "i8|", "i16|", "i32|", "i64|", "isize|", "f32|", "f64|", "struct|",
            "enum|", "type|", "String|", "Vec|", "Option|", "Result|", "Box|",
        ],
        sl_comment: "//",
        ml_comment_start: "/*",
        ml_comment_end: "*/",
        flags: HL_NUMBERS | HL_STRINGS,
    },
    Syntax {
        name: "python",
        patterns: &[".py"],
        keywords: &[
            "and", "as", "assert", "break", "class", "continue", "def", "del",
            "elif", "else", "except", "finally", "for", "from", "global", "if",
            "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass",
            "raise", "return", "try", "while", "with", "yield",
            "None|", "True|", "False|", "int|", "float|", "str|", "list|",
            "dict|", "set|", "tuple|", "bytes|",
        ],
        sl_comment: "#",
        ml_comment_start: "",
        ml_comment_end: "",
        flags: HL_NUMBERS | HL_STRINGS,
    },
];

/// Pick the descriptor for a file name, or `None` for plain text
pub fn detect(file_name: &str) -> Option<&'static Syntax> {
    LANGUAGES.iter().find(|syntax| {
        syntax.patterns.iter().any(|pat| {
            if let Some(suffix) = pat.strip_prefix('.') {
                std::path::Path::new(file_name)
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(suffix))
            } else {
                file_name.contains(pat)
            }
        })
    })
}

/// A character that can delimit a keyword token
pub fn is_separator(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0 || b",.()+-/*=~%<>[]:;".contains(&b)
}

/// Classify every rendered byte of one line.
///
/// `in_comment` is the open-comment state inherited from the previous row;
/// the returned flag is the state at the end of this row.
pub fn highlight_line(
    render: &[u8],
    syntax: Option<&Syntax>,
    mut in_comment: bool,
) -> (Vec<Highlight>, bool) {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(syn) = syntax else {
        return (hl, false);
    };

    let scs = syn.sl_comment.as_bytes();
    let mcs = syn.ml_comment_start.as_bytes();
    let mce = syn.ml_comment_end.as_bytes();

    let mut prev_sep = true;
    let mut in_string: u8 = 0;
    let mut i = 0;

    while i < render.len() {
        let b = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if in_string == 0 && !in_comment && !scs.is_empty() && render[i..].starts_with(scs) {
            for h in &mut hl[i..] {
                *h = Highlight::SlComment;
            }
            break;
        }

        if in_string == 0 && in_comment {
            if !mce.is_empty() && render[i..].starts_with(mce) {
                for h in &mut hl[i..i + mce.len()] {
                    *h = Highlight::MlComment;
                }
                i += mce.len();
                in_comment = false;
                prev_sep = true;
                continue;
            }
            hl[i] = Highlight::MlComment;
            i += 1;
            continue;
        }

        if in_string == 0 && !mcs.is_empty() && render[i..].starts_with(mcs) {
            for h in &mut hl[i..i + mcs.len()] {
                *h = Highlight::MlComment;
            }
            i += mcs.len();
            in_comment = true;
            continue;
        }

        if syn.flags & HL_STRINGS != 0 {
            if in_string != 0 {
                hl[i] = Highlight::String;
                if b == b'\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if b == in_string {
                    in_string = 0;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if b == b'"' || b == b'\'' {
                in_string = b;
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        if syn.flags & HL_NUMBERS != 0 {
            let continues = matches!(b, b'.' | b'x' | b'X' | b'h' | b'H')
                || (b.is_ascii_hexdigit() && !b.is_ascii_digit());
            if (b.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (continues && prev_hl == Highlight::Number)
            {
                hl[i] = Highlight::Number;
                i += 1;
                prev_sep = false;
                continue;
            }
        }

        if prev_sep {
            let mut matched = false;
            for kw in syn.keywords {
                let (word, class) = if let Some(w) = kw.strip_suffix('|') {
                    (w, Highlight::Keyword2)
                } else if kw.starts_with('#') {
                    (*kw, Highlight::Keyword3)
                } else {
                    (*kw, Highlight::Keyword1)
                };
                let wb = word.as_bytes();
                if render[i..].starts_with(wb)
                    && render.get(i + wb.len()).is_none_or(|&c| is_separator(c))
                {
                    for h in &mut hl[i..i + wb.len()] {
                        *h = class;
                    }
                    i += wb.len();
                    matched = true;
                    break;
                }
            }
            if matched {
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(b);
        i += 1;
    }

    (hl, in_comment)
}
