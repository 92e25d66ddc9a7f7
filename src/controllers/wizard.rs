// ABOUTME: Generic linear wizard over named steps sharing one draft
// `next` is gated by the current step's validator; `back` restores the draft as it was on entry

use std::fmt;
use tracing::debug;

/// Returns the blocking message, or `None` when the step may be left
pub type StepValidator<D> = Box<dyn Fn(&D) -> Option<String> + Send + Sync>;

pub struct WizardStep<D> {
    pub name: String,
    validator: Option<StepValidator<D>>,
}

impl<D> WizardStep<D> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), validator: None }
    }

    pub fn validated_by<F>(mut self, validator: F) -> Self
    where
        F: Fn(&D) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    pub fn validate(&self, draft: &D) -> Option<String> {
        self.validator.as_ref().and_then(|v| v(draft))
    }
}

impl<D> fmt::Debug for WizardStep<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardStep")
            .field("name", &self.name)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

pub struct WizardController<D: Clone> {
    steps: Vec<WizardStep<D>>,
    current: usize,
    draft: D,
    /// Draft as it was when each step after the first was entered
    snapshots: Vec<D>,
    submitting: bool,
}

impl<D: Clone> WizardController<D> {
    pub fn new(steps: Vec<WizardStep<D>>, draft: D) -> Self {
        Self {
            steps,
            current: 0,
            draft,
            snapshots: Vec::new(),
            submitting: false,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current
    }

    pub fn step_name(&self) -> Option<&str> {
        self.steps.get(self.current).map(|s| s.name.as_str())
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn is_final_step(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    pub fn validate_current(&self) -> Option<String> {
        self.validate_step(self.current)
    }

    /// Re-run the validator of any step against the current draft
    pub fn validate_step(&self, index: usize) -> Option<String> {
        self.steps.get(index).and_then(|s| s.validate(&self.draft))
    }

    /// Advance one step; returns the validator's message when blocked
    pub fn next(&mut self) -> Result<usize, String> {
        if self.is_final_step() {
            return Err(format!("'{}' is the last step", self.step_name().unwrap_or_default()));
        }
        if let Some(message) = self.validate_current() {
            debug!(step = self.current, "Wizard step blocked: {}", message);
            return Err(message);
        }
        self.snapshots.push(self.draft.clone());
        self.current += 1;
        debug!(step = self.current, "Wizard advanced");
        Ok(self.current)
    }

    /// Go back one step, discarding edits made in the step being left
    pub fn back(&mut self) -> bool {
        if self.current == 0 || self.submitting {
            return false;
        }
        if let Some(snapshot) = self.snapshots.pop() {
            self.draft = snapshot;
        }
        self.current -= 1;
        debug!(step = self.current, "Wizard went back");
        true
    }

    /// Enter the submitting state; only possible from the final step
    pub fn begin_submit(&mut self) -> bool {
        if !self.is_final_step() || self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    pub fn finish_submit(&mut self) {
        self.submitting = false;
    }
}
