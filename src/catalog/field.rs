use crate::graph::PropertyValue;

/// Input widget of a configuration field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number {
        min: Option<f64>,
        max: Option<f64>,
        /// Accepts fractional values.
        any_step: bool,
    },
    Checkbox,
    Select {
        options: Vec<PropertyValue>,
    },
}

/// One configurable field of a decoder or bus protocol form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: Option<PropertyValue>,
    pub placeholder: Option<&'static str>,
    pub required: bool,
}

impl FieldSpec {
    fn with_kind(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            default: None,
            placeholder: None,
            required: false,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::with_kind(name, label, FieldKind::Text)
    }

    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self::with_kind(
            name,
            label,
            FieldKind::Number {
                min: None,
                max: None,
                any_step: false,
            },
        )
    }

    pub fn checkbox(name: &'static str, label: &'static str, default: bool) -> Self {
        Self::with_kind(name, label, FieldKind::Checkbox).default(default)
    }

    pub fn select<V: Into<PropertyValue>>(
        name: &'static str,
        label: &'static str,
        options: impl IntoIterator<Item = V>,
    ) -> Self {
        let options = options.into_iter().map(Into::into).collect();
        Self::with_kind(name, label, FieldKind::Select { options })
    }

    pub fn default(mut self, value: impl Into<PropertyValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the accepted range of a number field. No effect on other kinds.
    pub fn range(mut self, lower: f64, upper: f64) -> Self {
        if let FieldKind::Number { min, max, .. } = &mut self.kind {
            *min = Some(lower);
            *max = Some(upper);
        }
        self
    }

    pub fn any_step(mut self) -> Self {
        if let FieldKind::Number { any_step, .. } = &mut self.kind {
            *any_step = true;
        }
        self
    }

    pub fn is_number(&self) -> bool {
        matches!(self.kind, FieldKind::Number { .. })
    }
}
