use std::fmt::Display;

use crate::type_checker::types::{MAX_OBJECT_SIZE, WORD_SIZE};

/// Symbolic address of code or data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    /// Derived from a source name
    Named(String),
    /// Generated; unique within one compilation
    Anonymous(u32),
}

impl Label {
    pub fn named(name: &str) -> Label {
        Label::Named(String::from(name))
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Named(name) => write!(f, "{}", name),
            Label::Anonymous(number) => write!(f, "L{}", number),
        }
    }
}

/// Hands out generated labels. One generator is shared by every pass of a
/// compilation so no two generated labels collide.
#[derive(Debug, Default)]
pub struct LabelGenerator {
    next: u32,
}

impl LabelGenerator {
    pub fn new() -> Self {
        LabelGenerator { next: 0 }
    }

    pub fn next_anonymous(&mut self) -> Label {
        let label = Label::Anonymous(self.next);
        self.next += 1;
        label
    }
}

const WORD: i32 = WORD_SIZE as i32;

/// Layout of one function's activation record.
///
/// ```text
///   FP + parameters_size  ^  incoming arguments
///   FP + 0                |  static link
///   FP - locals_size      |  locals
///   old FP                |
///   return address        |
///   SP + outgoing         v  outgoing arguments
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub label: Label,
    pub static_level: u32,
    /// Includes the static link slot
    pub parameters_size: u32,
    pub locals_size: u32,
    pub outgoing_args_size: u32,
}

impl Frame {
    pub fn old_frame_pointer_offset(&self) -> i32 {
        (-WORD).saturating_sub_unsigned(self.locals_size)
    }

    pub fn return_address_offset(&self) -> i32 {
        self.old_frame_pointer_offset().saturating_sub(WORD)
    }

    pub fn size(&self) -> u32 {
        self.locals_size
            .saturating_add(2 * WORD_SIZE)
            .saturating_add(self.outgoing_args_size)
    }
}

impl Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FRAME {} level={} params={} locals={} outgoing={} oldFP={} RA={} size={}",
            self.label,
            self.static_level,
            self.parameters_size,
            self.locals_size,
            self.outgoing_args_size,
            self.old_frame_pointer_offset(),
            self.return_address_offset(),
            self.size()
        )
    }
}

/// Accumulates a [`Frame`] while the function body is walked.
#[derive(Debug)]
pub struct FrameBuilder {
    label: Label,
    static_level: u32,
    parameters_size: u32,
    locals_size: u32,
    outgoing_args_size: u32,
}

impl FrameBuilder {
    pub fn new(label: Label, static_level: u32) -> Self {
        FrameBuilder {
            label,
            static_level,
            parameters_size: 0,
            locals_size: 0,
            outgoing_args_size: 0,
        }
    }

    /// Reserves `size` bytes of incoming arguments, returning their offset.
    /// `None` if the parameters would no longer be addressable from FP.
    pub fn add_parameter(&mut self, size: u32) -> Option<i32> {
        let offset = i32::try_from(self.parameters_size).ok()?;
        let parameters_size = self.parameters_size.checked_add(size)?;
        if parameters_size > MAX_OBJECT_SIZE {
            return None;
        }

        self.parameters_size = parameters_size;
        Some(offset)
    }

    /// Reserves `size` bytes of locals, returning their (negative) offset.
    /// `None` if the locals, old FP and return address would no longer be
    /// addressable from FP.
    pub fn add_local(&mut self, size: u32) -> Option<i32> {
        let locals_size = self.locals_size.checked_add(size)?;
        if locals_size.checked_add(2 * WORD_SIZE)? > MAX_OBJECT_SIZE {
            return None;
        }

        let offset = i32::try_from(locals_size).ok()?;
        self.locals_size = locals_size;
        Some(-offset)
    }

    /// Records a call needing `arguments_size` bytes of outgoing arguments.
    pub fn add_function_call(&mut self, arguments_size: u32) {
        self.outgoing_args_size = self.outgoing_args_size.max(arguments_size);
    }

    pub fn build(self) -> Frame {
        Frame {
            label: self.label,
            static_level: self.static_level,
            parameters_size: self.parameters_size,
            locals_size: self.locals_size,
            outgoing_args_size: self.outgoing_args_size,
        }
    }
}
