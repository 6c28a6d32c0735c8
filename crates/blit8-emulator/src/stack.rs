use crate::constants::STACK_DEPTH;

/// 16 16-bit addresses, used to call subroutines or functions and return from them.
/// Can go into 16 nested subroutines before the stack overflows. The stack pointer always
/// indexes the next free slot.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Stack {
    values: [u16; STACK_DEPTH],
    pointer: u8,
}

/// The stack had no room left, or nothing to return to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackError {
    Overflow,
    Underflow,
}

impl Stack {
    pub fn push(&mut self, address: u16) -> Result<(), StackError> {
        let slot = self
            .values
            .get_mut(usize::from(self.pointer))
            .ok_or(StackError::Overflow)?;
        *slot = address;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, StackError> {
        self.pointer = self.pointer.checked_sub(1).ok_or(StackError::Underflow)?;
        Ok(self.values[usize::from(self.pointer)])
    }

    pub fn pointer(&self) -> u8 {
        self.pointer
    }

    #[cfg(test)]
    pub fn get(&self, idx: u8) -> u16 {
        self.values[usize::from(idx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop() {
        let mut stack = Stack::default();
        stack.push(0x202).unwrap();
        stack.push(0x404).unwrap();
        assert_eq!(stack.pointer(), 2);
        assert_eq!(stack.pop(), Ok(0x404));
        assert_eq!(stack.pop(), Ok(0x202));
        assert_eq!(stack.pointer(), 0);
    }

    #[test]
    fn seventeenth_push_overflows() {
        let mut stack = Stack::default();
        for address in 0..16 {
            stack.push(address).unwrap();
        }
        assert_eq!(stack.push(0xABC), Err(StackError::Overflow));
        assert_eq!(stack.pointer(), 16);
        assert_eq!(stack.get(15), 15);
    }

    #[test]
    fn empty_pop_underflows() {
        let mut stack = Stack::default();
        assert_eq!(stack.pop(), Err(StackError::Underflow));
        assert_eq!(stack.pointer(), 0);
    }
}
