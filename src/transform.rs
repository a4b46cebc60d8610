//! Transformation pass framework.
//!
//! A pass takes a frozen method (by building a `Scope`/`Cfg`/`Dominators`/whatever analysis it
//! needs), decides what to rewrite, then opens a fresh `Method::Builder` to apply the rewrite
//! (spec.md §2 "Data flow"). `Pass::run` reports whether it changed anything; "not applicable" is
//! a normal `Ok(false)`, never an error (spec.md §7 "Transformations that cannot apply report
//! 'not applicable' via a normal return... those are not errors").

use crate::context::IrContext;
use crate::error::IrResult;
use crate::method::Method;

pub trait Pass {
    /// Runs this pass once against `method`. Returns whether the method's graph was changed.
    /// Re-running a pass that returns `true` may expose further opportunities (spec.md §4.6
    /// "the framework decides whether to iterate") — `run_to_fixpoint` below is one policy.
    fn run(&self, ctx: &mut IrContext, method: Method) -> IrResult<bool>;
}

/// Runs `pass` repeatedly until it reports no further change, or `max_iterations` is hit.
/// Grounded on the iterate-until-no-more-work shape every pass-manager in the pack uses; capped
/// rather than unconditional since nothing in spec.md guarantees a given pass is monotonically
/// decreasing in the general case.
pub fn run_to_fixpoint(pass: &dyn Pass, ctx: &mut IrContext, method: Method, max_iterations: usize) -> IrResult<usize> {
    let mut iterations = 0;
    while iterations < max_iterations {
        if !pass.run(ctx, method)? {
            break;
        }
        iterations += 1;
    }
    Ok(iterations)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::types::BasicValueType;

    /// Reports a change for its first `remaining` calls, then reports no-op.
    struct CountingPass {
        remaining: Cell<usize>,
    }

    impl Pass for CountingPass {
        fn run(&self, _ctx: &mut IrContext, _method: Method) -> IrResult<bool> {
            let left = self.remaining.get();
            if left == 0 {
                return Ok(false);
            }
            self.remaining.set(left - 1);
            Ok(true)
        }
    }

    #[test]
    fn stops_as_soon_as_a_pass_reports_no_change() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let pass = CountingPass { remaining: Cell::new(2) };

        let iterations = run_to_fixpoint(&pass, &mut ctx, method, 10).unwrap();
        assert_eq!(iterations, 2);
    }

    #[test]
    fn respects_the_iteration_cap() {
        let mut ctx = IrContext::new();
        let i32_ty = ctx.types.basic(BasicValueType::Int32);
        let method = Method::declare(&mut ctx, "f", vec![], i32_ty);
        let pass = CountingPass { remaining: Cell::new(100) };

        let iterations = run_to_fixpoint(&pass, &mut ctx, method, 3).unwrap();
        assert_eq!(iterations, 3);
    }
}
