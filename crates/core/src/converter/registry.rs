use super::types::Converter;

/// Converters in the order they were declared.
///
/// Entries are only ever appended. Lookups scan from the front, so when two
/// converters accept the same suffix the earlier one shadows the later.
#[derive(Debug, Clone, Default)]
pub struct ConverterRegistry {
    converters: Vec<Converter>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a converter.
    pub fn add(&mut self, converter: Converter) {
        self.converters.push(converter);
    }

    /// First converter whose `ext_from` is a suffix of `filename`.
    pub fn find(&self, filename: &str) -> Option<&Converter> {
        self.converters.iter().find(|c| c.matches(filename))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Converter> {
        self.converters.iter()
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl FromIterator<Converter> for ConverterRegistry {
    fn from_iter<I: IntoIterator<Item = Converter>>(iter: I) -> Self {
        Self {
            converters: iter.into_iter().collect(),
        }
    }
}
