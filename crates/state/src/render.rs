//! Human-readable rendering of a system state

use crate::store::SystemState;
use banker_types::render_vector;
use std::fmt;

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Claim matrix C")?;
        writeln!(f, "{}", self.claim().render())?;

        writeln!(f, "Allocation matrix A")?;
        writeln!(f, "{}", self.allocation().render())?;

        writeln!(f, "Need matrix C-A")?;
        writeln!(f, "{}", self.need().render())?;

        writeln!(f, "Resource vector R")?;
        writeln!(f, "{}", render_vector(self.resource_total()))?;

        writeln!(f, "Available vector V")?;
        writeln!(f, "{}", render_vector(self.resource_available()))
    }
}
