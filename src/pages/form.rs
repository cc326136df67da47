/// Text fields a page exposes for editing
///
/// The terminal UI drives every form through this trait: it moves a focus
/// index over `labels()` and edits the focused field in place.
pub trait Form {
    fn labels(&self) -> &'static [&'static str];

    fn field(&self, index: usize) -> Option<&str>;

    fn field_mut(&mut self, index: usize) -> Option<&mut String>;

    /// Fields whose contents are masked on screen
    fn is_secret(&self, _index: usize) -> bool {
        false
    }

    fn len(&self) -> usize {
        self.labels().len()
    }

    fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }
}

/// Focus position within a [`Form`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormFocus(usize);

impl FormFocus {
    pub fn index(&self) -> usize {
        self.0
    }

    pub fn next(&mut self, form: &dyn Form) {
        if !form.is_empty() {
            self.0 = (self.0 + 1) % form.len();
        }
    }

    pub fn previous(&mut self, form: &dyn Form) {
        if !form.is_empty() {
            self.0 = (self.0 + form.len() - 1) % form.len();
        }
    }

    pub fn insert(&self, form: &mut dyn Form, c: char) {
        if let Some(field) = form.field_mut(self.0) {
            field.push(c);
        }
    }

    pub fn backspace(&self, form: &mut dyn Form) {
        if let Some(field) = form.field_mut(self.0) {
            field.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Pair {
        a: String,
        b: String,
    }

    impl Form for Pair {
        fn labels(&self) -> &'static [&'static str] {
            &["A", "B"]
        }

        fn field(&self, index: usize) -> Option<&str> {
            match index {
                0 => Some(&self.a),
                1 => Some(&self.b),
                _ => None,
            }
        }

        fn field_mut(&mut self, index: usize) -> Option<&mut String> {
            match index {
                0 => Some(&mut self.a),
                1 => Some(&mut self.b),
                _ => None,
            }
        }
    }

    #[test]
    fn test_focus_wraps_and_edits() {
        let mut form = Pair::default();
        let mut focus = FormFocus::default();

        focus.insert(&mut form, 'x');
        focus.next(&form);
        focus.insert(&mut form, 'y');
        focus.insert(&mut form, 'z');
        focus.backspace(&mut form);
        focus.next(&form);

        assert_eq!(focus.index(), 0);
        assert_eq!(form.field(0), Some("x"));
        assert_eq!(form.field(1), Some("y"));

        focus.previous(&form);
        assert_eq!(focus.index(), 1);
    }
}
