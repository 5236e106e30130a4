/// Layout direction of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Guesses direction from script: left-to-right only when ASCII letters
    /// strictly outnumber non-ASCII characters. Ties go right-to-left.
    pub fn detect(text: &str) -> Self {
        if is_left_to_right(text) {
            TextDirection::Ltr
        } else {
            TextDirection::Rtl
        }
    }

    /// Value for the HTML `dir` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }

    /// Value for CSS `text-align`.
    pub fn align(self) -> &'static str {
        match self {
            TextDirection::Ltr => "left",
            TextDirection::Rtl => "right",
        }
    }
}

pub fn is_left_to_right(text: &str) -> bool {
    let (latin, non_latin) = text.chars().fold((0usize, 0usize), |(latin, other), c| {
        if c.is_ascii_alphabetic() {
            (latin + 1, other)
        } else if !c.is_ascii() {
            (latin, other + 1)
        } else {
            (latin, other)
        }
    });

    latin > non_latin
}
