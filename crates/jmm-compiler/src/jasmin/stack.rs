//! Operand-stack depth tracking.
//!
//! Follows the net stack effect of each emitted instruction so the method
//! header can declare the exact maximum depth.

/// Current and maximum operand-stack depth of one method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StackDepth {
    current: u16,
    max: u16,
}

impl StackDepth {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` values pushed.
    pub fn push(&mut self, n: u16) {
        self.current = self.current.saturating_add(n);
        self.max = self.max.max(self.current);
    }

    /// Record `n` values popped. Popping past empty clamps to zero.
    pub fn pop(&mut self, n: u16) {
        self.current = self.current.saturating_sub(n);
    }

    pub fn current(&self) -> u16 {
        self.current
    }

    /// Deepest point reached so far.
    pub fn max(&self) -> u16 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_empty() {
        let depth = StackDepth::new();
        assert_eq!(depth.current(), 0);
        assert_eq!(depth.max(), 0);
    }

    #[test]
    fn max_survives_pops() {
        let mut depth = StackDepth::new();
        depth.push(2);
        depth.pop(1);
        depth.push(1);
        depth.pop(2);
        assert_eq!(depth.current(), 0);
        assert_eq!(depth.max(), 2);
    }

    #[test]
    fn pop_clamps_at_zero() {
        let mut depth = StackDepth::new();
        depth.push(1);
        depth.pop(3);
        assert_eq!(depth.current(), 0);
        depth.push(1);
        assert_eq!(depth.max(), 1);
    }
}
