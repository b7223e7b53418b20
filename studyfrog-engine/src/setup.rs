//! The rehearsal-run setup form (§4.5.1).

use studyfrog_model::{Error, Result};

/// The collected inputs a *start* event carries in its payload.
#[derive(Debug, Clone)]
pub struct SetupForm {
    pub stacks: Vec<String>,
    pub difficulty: Option<String>,
    pub priority: Option<String>,
    pub item_order_randomization_enabled: bool,
    pub time_counter_enabled: bool,
    pub time_limit_enabled: bool,
    pub time_limit_minutes: u32,
}

/// Slider bounds for `time_limit_minutes` (§6).
pub const TIME_LIMIT_MIN_MINUTES: u32 = 1;
pub const TIME_LIMIT_MAX_MINUTES: u32 = 480;
pub const TIME_LIMIT_DEFAULT_MINUTES: u32 = 60;

impl SetupForm {
    /// Validates the form: `stacks` must be non-empty, and when a time
    /// limit is enabled its value must fall within the slider's bounds.
    pub fn validate(&self) -> Result<()> {
        if self.stacks.is_empty() {
            return Err(Error::validation("at least one stack must be selected"));
        }
        if self.time_limit_enabled
            && !(TIME_LIMIT_MIN_MINUTES..=TIME_LIMIT_MAX_MINUTES).contains(&self.time_limit_minutes)
        {
            return Err(Error::validation(format!(
                "time_limit_minutes must be between {TIME_LIMIT_MIN_MINUTES} and {TIME_LIMIT_MAX_MINUTES}, got {}",
                self.time_limit_minutes
            )));
        }
        Ok(())
    }
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            stacks: Vec::new(),
            difficulty: None,
            priority: None,
            item_order_randomization_enabled: false,
            time_counter_enabled: true,
            time_limit_enabled: false,
            time_limit_minutes: TIME_LIMIT_DEFAULT_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stack_selection_fails_validation() {
        let form = SetupForm::default();
        assert!(form.validate().is_err());
    }

    #[test]
    fn time_limit_out_of_bounds_fails_validation() {
        let mut form = SetupForm { stacks: vec!["STACK_0".to_string()], ..Default::default() };
        form.time_limit_enabled = true;
        form.time_limit_minutes = 500;
        assert!(form.validate().is_err());
    }

    #[test]
    fn disabled_time_limit_skips_bounds_check() {
        let form = SetupForm { stacks: vec!["STACK_0".to_string()], ..Default::default() };
        assert!(form.validate().is_ok());
    }
}
