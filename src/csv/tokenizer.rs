//! Character-level CSV tokenizer.
//!
//! A two-state machine (`Unquoted` / `Quoted`) driven by five character
//! classes. The full transition table:
//!
//! | State      | Class   | Action                                              |
//! |------------|---------|-----------------------------------------------------|
//! | `Unquoted` | comma   | end field                                           |
//! | `Unquoted` | quote   | enter `Quoted`                                      |
//! | `Unquoted` | CR      | end field and row; a following LF is consumed too   |
//! | `Unquoted` | LF      | end field and row                                   |
//! | `Unquoted` | other   | append                                              |
//! | `Quoted`   | quote   | `""` appends `"`; a lone `"` returns to `Unquoted`  |
//! | `Quoted`   | any     | append literally                                    |
//!
//! Input that does not end with a line terminator has its pending row
//! flushed at the end.

use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Comma,
    Quote,
    Cr,
    Lf,
    Other(char),
}

impl CharClass {
    fn of(c: char) -> Self {
        match c {
            ',' => CharClass::Comma,
            '"' => CharClass::Quote,
            '\r' => CharClass::Cr,
            '\n' => CharClass::Lf,
            other => CharClass::Other(other),
        }
    }

    fn as_char(self) -> char {
        match self {
            CharClass::Comma => ',',
            CharClass::Quote => '"',
            CharClass::Cr => '\r',
            CharClass::Lf => '\n',
            CharClass::Other(c) => c,
        }
    }
}

/// Split text into rows of raw string fields.
///
/// No row filtering happens here: a blank line yields a row with a single
/// empty field.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    Tokenizer::new(text).run()
}

struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    state: State,
    field: String,
    row: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            state: State::Unquoted,
            field: String::new(),
            row: Vec::new(),
            rows: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Vec<String>> {
        while let Some(c) = self.chars.next() {
            self.step(CharClass::of(c));
        }

        if !self.field.is_empty() || !self.row.is_empty() {
            self.end_row();
        }
        self.rows
    }

    fn step(&mut self, class: CharClass) {
        match (self.state, class) {
            (State::Unquoted, CharClass::Comma) => self.end_field(),
            (State::Unquoted, CharClass::Quote) => self.state = State::Quoted,
            (State::Unquoted, CharClass::Cr) => {
                self.chars.next_if_eq(&'\n');
                self.end_row();
            }
            (State::Unquoted, CharClass::Lf) => self.end_row(),
            (State::Unquoted, CharClass::Other(c)) => self.field.push(c),

            (State::Quoted, CharClass::Quote) => {
                if self.chars.next_if_eq(&'"').is_some() {
                    self.field.push('"');
                } else {
                    self.state = State::Unquoted;
                }
            }
            (State::Quoted, other) => self.field.push(other.as_char()),
        }
    }

    fn end_field(&mut self) {
        self.row.push(std::mem::take(&mut self.field));
    }

    fn end_row(&mut self) {
        self.end_field();
        self.rows.push(std::mem::take(&mut self.row));
    }
}
