use std::collections::BTreeSet;

/// A declarative validation constraint attached to a field definition.
///
/// These describe constraints enforced server-side; this crate only records
/// which rules apply, it does not enforce them against values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationRule {
    NotEmpty,
    NumericOnly,
    MaxCharacters,
    FourDigitYear,
    TimeOfDay,
    TimestampField,
    DateField,
    TimeField,
}

impl ValidationRule {
    /// Each rule owns a distinct bit in a field's validation mask.
    pub const fn mask_bit(self) -> u32 {
        match self {
            ValidationRule::NotEmpty => 1 << 0,
            ValidationRule::NumericOnly => 1 << 1,
            ValidationRule::MaxCharacters => 1 << 2,
            ValidationRule::FourDigitYear => 1 << 3,
            ValidationRule::TimeOfDay => 1 << 4,
            ValidationRule::TimestampField => 1 << 5,
            ValidationRule::DateField => 1 << 6,
            ValidationRule::TimeField => 1 << 7,
        }
    }
}

/// Schema description of one field, either on the layout itself or scoped to
/// a related set.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    auto_entered: bool,
    global: bool,
    max_repeat: u32,
    result: String,
    field_type: String,
    max_characters: Option<u32>,
    rules: BTreeSet<ValidationRule>,
    validation_mask: u32,
}

impl Field {
    pub(crate) fn new(
        name: String,
        auto_entered: bool,
        global: bool,
        max_repeat: u32,
        result: String,
        field_type: String,
        max_characters: Option<u32>,
        rules: BTreeSet<ValidationRule>,
    ) -> Self {
        let validation_mask = rules.iter().fold(0, |mask, rule| mask | rule.mask_bit());
        Field {
            name,
            auto_entered,
            global,
            max_repeat,
            result,
            field_type,
            max_characters,
            rules,
            validation_mask,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the server auto-enters a value for this field.
    pub fn is_auto_entered(&self) -> bool {
        self.auto_entered
    }

    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Declared repetition count; repeating fields hold more than one value.
    pub fn max_repeat(&self) -> u32 {
        self.max_repeat
    }

    /// Result type tag as declared by the server (`text`, `number`, `date`,
    /// `time`, `timestamp`, `container`).
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Field kind tag (`normal`, `calculation`, `summary`).
    pub fn field_type(&self) -> &str {
        &self.field_type
    }

    pub fn max_characters(&self) -> Option<u32> {
        self.max_characters
    }

    pub fn has_validation_rule(&self, rule: ValidationRule) -> bool {
        self.rules.contains(&rule)
    }

    pub fn validation_rules(&self) -> impl Iterator<Item = ValidationRule> + '_ {
        self.rules.iter().copied()
    }

    /// All applicable rules OR-ed together via [`ValidationRule::mask_bit`].
    pub fn validation_mask(&self) -> u32 {
        self.validation_mask
    }
}
