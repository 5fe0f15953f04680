use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Record;

/// Render one `Label: value` line, highlighting the focused field and showing
/// a placeholder for empty ones.
fn field_line(label: &str, value: &str, active: bool, required: bool) -> Line<'static> {
    let display = match (value.is_empty(), required) {
        (true, true) => "<required>".to_string(),
        (true, false) => "<optional>".to_string(),
        (false, _) => value.to_string(),
    };

    let style = if active {
        Style::default().fg(Color::Yellow)
    } else if value.is_empty() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(format!("{label}: ")),
        Span::styled(display, style),
    ])
}

/// Column in the popup where the cursor should sit for a text field.
pub(crate) fn cursor_offset(label: &str, value: &str) -> u16 {
    (label.chars().count() + 2 + value.chars().count()) as u16
}

/// Values collected by the book form, trimmed and ready for the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewBook {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) genre: String,
    pub(crate) publication_date: String,
    pub(crate) isbn: String,
    pub(crate) available: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum BookField {
    Title,
    Author,
    Genre,
    PublicationDate,
    Isbn,
    Available,
}

impl BookField {
    pub(crate) const ALL: [BookField; 6] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::PublicationDate,
        BookField::Isbn,
        BookField::Available,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Genre => "Genre",
            BookField::PublicationDate => "Publication Date (YYYY-MM-DD)",
            BookField::Isbn => "ISBN",
            BookField::Available => "Available",
        }
    }

    fn required(self) -> bool {
        matches!(self, BookField::Title | BookField::Author)
    }
}

/// Form state for adding a book.
#[derive(Clone, Debug)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) genre: String,
    pub(crate) publication_date: String,
    pub(crate) isbn: String,
    pub(crate) available: bool,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl Default for BookForm {
    /// New books start out available.
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            publication_date: String::new(),
            isbn: String::new(),
            available: true,
            active: 0,
            error: None,
        }
    }
}

impl BookForm {
    pub(crate) fn active_field(&self) -> BookField {
        BookField::ALL[self.active]
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % BookField::ALL.len();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = (self.active + BookField::ALL.len() - 1) % BookField::ALL.len();
    }

    fn text_mut(&mut self, field: BookField) -> Option<&mut String> {
        match field {
            BookField::Title => Some(&mut self.title),
            BookField::Author => Some(&mut self.author),
            BookField::Genre => Some(&mut self.genre),
            BookField::PublicationDate => Some(&mut self.publication_date),
            BookField::Isbn => Some(&mut self.isbn),
            BookField::Available => None,
        }
    }

    pub(crate) fn value(&self, field: BookField) -> String {
        match field {
            BookField::Title => self.title.clone(),
            BookField::Author => self.author.clone(),
            BookField::Genre => self.genre.clone(),
            BookField::PublicationDate => self.publication_date.clone(),
            BookField::Isbn => self.isbn.clone(),
            BookField::Available => {
                let mark = if self.available { "[x]" } else { "[ ]" };
                mark.to_string()
            }
        }
    }

    /// Type into the focused field. On the availability toggle, space flips
    /// it and `y`/`n` set it explicitly.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let field = self.active_field();
        if field == BookField::Available {
            match ch {
                ' ' => self.available = !self.available,
                'y' | 'Y' => self.available = true,
                'n' | 'N' => self.available = false,
                _ => return false,
            }
            return true;
        }
        if ch.is_control() {
            return false;
        }
        if let Some(text) = self.text_mut(field) {
            text.push(ch);
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active_field();
        if let Some(text) = self.text_mut(field) {
            text.pop();
        }
    }

    /// Only title and author are required; nothing is format-checked.
    pub(crate) fn parse_inputs(&self) -> Result<NewBook> {
        let title = self.title.trim();
        let author = self.author.trim();
        if title.is_empty() || author.is_empty() {
            return Err(anyhow!("Please fill in at least Title and Author."));
        }
        Ok(NewBook {
            title: title.to_string(),
            author: author.to_string(),
            genre: self.genre.trim().to_string(),
            publication_date: self.publication_date.trim().to_string(),
            isbn: self.isbn.trim().to_string(),
            available: self.available,
        })
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        BookField::ALL
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field_line(
                    field.label(),
                    &self.value(*field),
                    idx == self.active,
                    field.required(),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewBorrower {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) address: String,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum BorrowerField {
    Name,
    Email,
    Phone,
    Address,
}

impl BorrowerField {
    pub(crate) const ALL: [BorrowerField; 4] = [
        BorrowerField::Name,
        BorrowerField::Email,
        BorrowerField::Phone,
        BorrowerField::Address,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BorrowerField::Name => "Name",
            BorrowerField::Email => "Email",
            BorrowerField::Phone => "Phone",
            BorrowerField::Address => "Address",
        }
    }

    fn required(self) -> bool {
        matches!(self, BorrowerField::Name | BorrowerField::Email)
    }
}

#[derive(Default, Clone, Debug)]
pub(crate) struct BorrowerForm {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) address: String,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl BorrowerForm {
    pub(crate) fn active_field(&self) -> BorrowerField {
        BorrowerField::ALL[self.active]
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % BorrowerField::ALL.len();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = (self.active + BorrowerField::ALL.len() - 1) % BorrowerField::ALL.len();
    }

    pub(crate) fn value(&self, field: BorrowerField) -> &str {
        match field {
            BorrowerField::Name => &self.name,
            BorrowerField::Email => &self.email,
            BorrowerField::Phone => &self.phone,
            BorrowerField::Address => &self.address,
        }
    }

    fn value_mut(&mut self, field: BorrowerField) -> &mut String {
        match field {
            BorrowerField::Name => &mut self.name,
            BorrowerField::Email => &mut self.email,
            BorrowerField::Phone => &mut self.phone,
            BorrowerField::Address => &mut self.address,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active_field();
        self.value_mut(field).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active_field();
        self.value_mut(field).pop();
    }

    pub(crate) fn parse_inputs(&self) -> Result<NewBorrower> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(anyhow!("Please fill in at least Name and Email."));
        }
        Ok(NewBorrower {
            name: name.to_string(),
            email: email.to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        })
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        BorrowerField::ALL
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field_line(
                    field.label(),
                    self.value(*field),
                    idx == self.active,
                    field.required(),
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewCheckout {
    pub(crate) book_id: String,
    pub(crate) borrower_id: String,
    pub(crate) checkout_date: String,
    pub(crate) due_date: String,
    pub(crate) return_date: Option<String>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum CheckoutField {
    BookId,
    BorrowerId,
    CheckoutDate,
    DueDate,
    ReturnDate,
}

impl CheckoutField {
    pub(crate) const ALL: [CheckoutField; 5] = [
        CheckoutField::BookId,
        CheckoutField::BorrowerId,
        CheckoutField::CheckoutDate,
        CheckoutField::DueDate,
        CheckoutField::ReturnDate,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            CheckoutField::BookId => "Book ID",
            CheckoutField::BorrowerId => "Borrower ID",
            CheckoutField::CheckoutDate => "Checkout Date (YYYY-MM-DD)",
            CheckoutField::DueDate => "Due Date (YYYY-MM-DD)",
            CheckoutField::ReturnDate => "Return Date (YYYY-MM-DD)",
        }
    }

    fn required(self) -> bool {
        !matches!(self, CheckoutField::ReturnDate)
    }
}

#[derive(Default, Clone, Debug)]
pub(crate) struct CheckoutForm {
    pub(crate) book_id: String,
    pub(crate) borrower_id: String,
    pub(crate) checkout_date: String,
    pub(crate) due_date: String,
    pub(crate) return_date: String,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl CheckoutForm {
    /// Pre-fill the book id, used when the user starts a checkout from a
    /// selected book.
    pub(crate) fn for_book(book_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
            active: 1,
            ..Self::default()
        }
    }

    pub(crate) fn active_field(&self) -> CheckoutField {
        CheckoutField::ALL[self.active]
    }

    pub(crate) fn next_field(&mut self) {
        self.active = (self.active + 1) % CheckoutField::ALL.len();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = (self.active + CheckoutField::ALL.len() - 1) % CheckoutField::ALL.len();
    }

    pub(crate) fn value(&self, field: CheckoutField) -> &str {
        match field {
            CheckoutField::BookId => &self.book_id,
            CheckoutField::BorrowerId => &self.borrower_id,
            CheckoutField::CheckoutDate => &self.checkout_date,
            CheckoutField::DueDate => &self.due_date,
            CheckoutField::ReturnDate => &self.return_date,
        }
    }

    fn value_mut(&mut self, field: CheckoutField) -> &mut String {
        match field {
            CheckoutField::BookId => &mut self.book_id,
            CheckoutField::BorrowerId => &mut self.borrower_id,
            CheckoutField::CheckoutDate => &mut self.checkout_date,
            CheckoutField::DueDate => &mut self.due_date,
            CheckoutField::ReturnDate => &mut self.return_date,
        }
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active_field();
        self.value_mut(field).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active_field();
        self.value_mut(field).pop();
    }

    /// Everything but the return date is required. A blank return date means
    /// the book is still out.
    pub(crate) fn parse_inputs(&self) -> Result<NewCheckout> {
        let required = [
            self.book_id.trim(),
            self.borrower_id.trim(),
            self.checkout_date.trim(),
            self.due_date.trim(),
        ];
        if required.iter().any(|value| value.is_empty()) {
            return Err(anyhow!(
                "Book ID, Borrower ID, Checkout Date and Due Date are required."
            ));
        }
        let return_date = self.return_date.trim();
        Ok(NewCheckout {
            book_id: required[0].to_string(),
            borrower_id: required[1].to_string(),
            checkout_date: required[2].to_string(),
            due_date: required[3].to_string(),
            return_date: (!return_date.is_empty()).then(|| return_date.to_string()),
        })
    }

    pub(crate) fn lines(&self) -> Vec<Line<'static>> {
        CheckoutField::ALL
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                field_line(
                    field.label(),
                    self.value(*field),
                    idx == self.active,
                    field.required(),
                )
            })
            .collect()
    }
}

/// Pending deletion awaiting a yes/no answer.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmDelete {
    pub(crate) record: Record,
}

impl ConfirmDelete {
    pub(crate) fn prompt(&self) -> String {
        let kind = match &self.record {
            Record::Book(_) => "book",
            Record::Borrower(_) => "borrower",
            Record::Checkout(_) => "checkout",
        };
        format!("Delete {kind} \"{}\" ({})?", self.record, self.record.id())
    }
}
