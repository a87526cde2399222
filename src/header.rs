//! Header field list.
//!
//! Ported from the original's `Header` (`include/header.h`): an ordered
//! vector of `(name, value)` pairs with a tombstone bit per field, a lazy
//! `isSorted` flag, binary-search lookup, and insertion-order preservation
//! until `sort()` is called. We keep owned `String`s per field rather than
//! the original's single backing `base_` buffer with byte offsets — no
//! zero-copy benefit survives the translation since `Header` must outlive
//! the parse (`spec.md` §9 "Zero-copy peek views").

#[derive(Debug, Clone)]
struct Field {
    name: String,
    value: Option<String>,
}

/// An ordered, sortable, searchable list of HTTP header fields.
#[derive(Debug, Clone, Default)]
pub struct Header {
    fields: Vec<Field>,
    is_sorted: bool,
}

impl Header {
    pub fn new() -> Header {
        Header {
            fields: Vec::new(),
            is_sorted: true,
        }
    }

    pub fn reset(&mut self) {
        self.fields.clear();
        self.is_sorted = true;
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Append a field, preserving insertion order. Invalidates sortedness.
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field {
            name: name.into(),
            value: Some(value.into()),
        });
        self.is_sorted = false;
    }

    /// Tombstone a field by index: it is skipped by `traverse` and
    /// `search`, but its slot is not removed (no reordering happens).
    pub fn remove_field(&mut self, index: usize) {
        self.fields[index].value = None;
    }

    /// Raw indexed access to a non-tombstoned field.
    pub fn field(&self, index: usize) -> Option<(&str, &str)> {
        let field = &self.fields[index];
        field.value.as_deref().map(|value| (field.name.as_str(), value))
    }

    /// Visit every non-tombstoned field in current order, stopping early if
    /// `callback` returns `false`.
    pub fn traverse<F>(&self, mut callback: F)
    where
        F: FnMut(usize, &str, &str) -> bool,
    {
        for (index, field) in self.fields.iter().enumerate() {
            if let Some(value) = field.value.as_deref() {
                if !callback(index, field.name.as_str(), value) {
                    break;
                }
            }
        }
    }

    /// Sort fields into stable lexicographic order by name. A no-op if
    /// already sorted.
    pub fn sort(&mut self) {
        if !self.is_sorted {
            self.fields.sort_by(|a, b| a.name.cmp(&b.name));
            self.is_sorted = true;
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.is_sorted
    }

    /// Binary-search for the lower bound of `name`, then scan forward while
    /// the name matches, calling `callback(index, value)` for each
    /// non-tombstoned match; stop early if `callback` returns `false`.
    ///
    /// # Panics
    ///
    /// Panics if the header has not been `sort()`ed (matching the
    /// original's `SIREN_ASSERT(isSorted_)`).
    pub fn search<F>(&self, name: &str, mut callback: F)
    where
        F: FnMut(usize, &str) -> bool,
    {
        assert!(self.is_sorted, "Header::search called before sort()");
        let start = self
            .fields
            .partition_point(|field| field.name.as_str() < name);
        for (offset, field) in self.fields[start..].iter().enumerate() {
            if field.name != name {
                break;
            }
            if let Some(value) = field.value.as_deref() {
                if !callback(start + offset, value) {
                    break;
                }
            }
        }
    }
}
