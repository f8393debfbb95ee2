//! Per-run emission state.
//!
//! One [`EmitContext`] lives exactly as long as one generation run. It holds everything the visitors accumulate:
//! runtime helper flags, requested imports, the stack of lexical scope frames and the stack of enclosing loops.

use std::collections::{BTreeSet, HashSet};

use ciswift_ast::{CiType, Expr, Stmt};

/// Runtime helpers emitted after the declarations, in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Shim {
    CiError,
    ArrayRef,
    StringCharAt,
    StringIndexOf,
    StringSubstring,
}

impl Shim {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Shim::CiError => "CiError",
            Shim::ArrayRef => "ArrayRef",
            Shim::StringCharAt => "ciStringCharAt",
            Shim::StringIndexOf => "ciStringIndexOf",
            Shim::StringSubstring => "ciStringSubstring",
        }
    }
}

/// Names declared at one lexical depth.
#[derive(Debug, Default)]
struct ScopeFrame {
    names: HashSet<String>,
    /// More than one UTF-8 `GetBytes` statement shares this frame, so `cibytes` must be a `var`.
    mutable_bytes: bool,
}

/// What a `continue` must run before jumping back to the loop head.
#[derive(Debug, Clone)]
pub(crate) enum ContinueAction<'a> {
    /// Native `continue`.
    Plain,
    /// Lowered `for`: run the advance statement first.
    Advance(&'a Stmt),
    /// Lowered `do`-`while`: evaluate the condition and leave the labelled loop when it fails.
    CheckCondition { cond: &'a Expr, label: String },
}

#[derive(Debug, Default)]
pub(crate) struct EmitContext<'a> {
    shims: BTreeSet<Shim>,
    includes: BTreeSet<&'static str>,
    scopes: Vec<ScopeFrame>,
    loops: Vec<ContinueAction<'a>>,
    return_type: Option<&'a CiType>,
    next_label: usize,
}

impl<'a> EmitContext<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Request a runtime helper. The flag is sticky for the rest of the run.
    pub(crate) fn activate(&mut self, shim: Shim) {
        if self.shims.insert(shim) {
            tracing::debug!(shim = shim.name(), "runtime helper activated");
        }
    }

    pub(crate) fn is_active(&self, shim: Shim) -> bool {
        self.shims.contains(&shim)
    }

    /// Active helpers in emission order.
    pub(crate) fn shims(&self) -> impl Iterator<Item = Shim> + '_ {
        self.shims.iter().copied()
    }

    /// Request `import module` at the top of the output.
    pub(crate) fn include(&mut self, module: &'static str) {
        if self.includes.insert(module) {
            tracing::debug!(module, "import requested");
        }
    }

    /// Requested imports, sorted.
    pub(crate) fn includes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.includes.iter().copied()
    }

    pub(crate) fn push_scope(&mut self) {
        self.scopes.push(ScopeFrame::default());
    }

    pub(crate) fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Record `name` in the innermost frame; `false` if it was already declared there.
    pub(crate) fn declare(&mut self, name: &str) -> bool {
        match self.scopes.last_mut() {
            Some(frame) => frame.names.insert(name.to_string()),
            None => true,
        }
    }

    pub(crate) fn set_mutable_bytes(&mut self, mutable: bool) {
        if let Some(frame) = self.scopes.last_mut() {
            frame.mutable_bytes = mutable;
        }
    }

    pub(crate) fn mutable_bytes(&self) -> bool {
        self.scopes.last().is_some_and(|frame| frame.mutable_bytes)
    }

    pub(crate) fn push_loop(&mut self, action: ContinueAction<'a>) {
        self.loops.push(action);
    }

    pub(crate) fn pop_loop(&mut self) {
        self.loops.pop();
    }

    pub(crate) fn current_loop(&self) -> Option<&ContinueAction<'a>> {
        self.loops.last()
    }

    /// Fresh label for a lowered loop.
    pub(crate) fn fresh_label(&mut self) -> String {
        self.next_label += 1;
        format!("ciLoop{}", self.next_label)
    }

    pub(crate) fn set_return_type(&mut self, ty: Option<&'a CiType>) {
        self.return_type = ty;
    }

    pub(crate) fn return_type(&self) -> Option<&'a CiType> {
        self.return_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shims_iterate_in_emission_order() {
        let mut ctx = EmitContext::new();
        ctx.activate(Shim::StringSubstring);
        ctx.activate(Shim::CiError);
        ctx.activate(Shim::ArrayRef);
        ctx.activate(Shim::CiError);
        let order: Vec<_> = ctx.shims().collect();
        assert_eq!(order, vec![Shim::CiError, Shim::ArrayRef, Shim::StringSubstring]);
    }

    #[test]
    fn test_declare_is_per_frame() {
        let mut ctx = EmitContext::new();
        ctx.push_scope();
        assert!(ctx.declare("i"));
        assert!(!ctx.declare("i"));
        ctx.push_scope();
        assert!(ctx.declare("i"));
        ctx.pop_scope();
        assert!(!ctx.declare("i"));
    }

    #[test]
    fn test_mutable_bytes_resets_with_frame() {
        let mut ctx = EmitContext::new();
        ctx.push_scope();
        ctx.set_mutable_bytes(true);
        ctx.push_scope();
        assert!(!ctx.mutable_bytes());
        ctx.pop_scope();
        assert!(ctx.mutable_bytes());
    }

    #[test]
    fn test_includes_are_sorted_and_unique() {
        let mut ctx = EmitContext::new();
        ctx.include("Foundation");
        ctx.include("Dispatch");
        ctx.include("Foundation");
        assert_eq!(ctx.includes().collect::<Vec<_>>(), vec!["Dispatch", "Foundation"]);
    }

    #[test]
    fn test_fresh_labels_are_unique() {
        let mut ctx = EmitContext::new();
        assert_eq!(ctx.fresh_label(), "ciLoop1");
        assert_eq!(ctx.fresh_label(), "ciLoop2");
    }
}
