//! The pre-compilation validation pass

use std::fmt::{Debug, Display};

/// Pre-compilation validation of tables.
///
/// The format describes various requirements that are awkward to encode in
/// the type system, such as requiring certain arrays to have equal lengths.
/// These requirements are enforced via a validation pass before writing.
pub trait Validate {
    /// Ensure that this table is well-formed, reporting any errors.
    fn validate(&self) -> Result<(), ValidationReport> {
        let mut ctx = ValidationCtx::default();
        self.validate_impl(&mut ctx);
        if ctx.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationReport { errors: ctx.errors })
        }
    }

    /// Validate this table, reporting errors into the context.
    fn validate_impl(&self, ctx: &mut ValidationCtx);
}

/// A context for collecting validation errors.
///
/// As validation travels down through a table, the path is recorded via
/// calls to [in_table][Self::in_table] and [in_field][Self::in_field], so
/// each reported error carries its location.
#[derive(Clone, Debug, Default)]
pub struct ValidationCtx {
    cur_location: Vec<&'static str>,
    errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
struct ValidationError {
    error: String,
    location: Vec<&'static str>,
}

/// One or more validation errors.
#[derive(Clone)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationCtx {
    /// Run the provided closure in the context of a new table.
    pub fn in_table(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(name, f);
    }

    /// Run the provided closure in the context of a new field.
    pub fn in_field(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.with_elem(name, f);
    }

    fn with_elem(&mut self, name: &'static str, f: impl FnOnce(&mut ValidationCtx)) {
        self.cur_location.push(name);
        f(self);
        self.cur_location.pop();
    }

    /// Report an error at the current location.
    pub fn report(&mut self, error: impl Into<String>) {
        self.errors.push(ValidationError {
            error: error.into(),
            location: self.cur_location.clone(),
        });
    }

    /// Report when `len` cannot be stored in a 16-bit count field.
    pub fn check_array_len(&mut self, len: usize) {
        if len > u16::MAX as usize {
            self.report("array exceeds u16 length");
        }
    }
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} validation errors:", self.errors.len())?;
        for error in &self.errors {
            write!(f, "  ")?;
            for elem in &error.location {
                write!(f, "{elem}: ")?;
            }
            writeln!(f, "{}", error.error)?;
        }
        Ok(())
    }
}

impl Debug for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for ValidationReport {}

#[cfg(test)]
mod tests {
    use super::*;

    struct TooLong;

    impl Validate for TooLong {
        fn validate_impl(&self, ctx: &mut ValidationCtx) {
            ctx.in_table("TooLong", |ctx| {
                ctx.in_field("values", |ctx| ctx.check_array_len(u16::MAX as usize + 1))
            })
        }
    }

    #[test]
    fn reports_carry_location() {
        let report = TooLong.validate().unwrap_err();
        assert_eq!(report.error_count(), 1);
        let printed = report.to_string();
        assert!(printed.contains("TooLong"));
        assert!(printed.contains("values"));
    }
}
