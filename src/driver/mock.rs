//! Recording driver for tests
//!
//! Every call is appended to a log so tests can assert exactly which side
//! effects a surface issued and in what order.

use bytemuck::Pod;

use super::{Driver, DriverError, FrameStore, InitParams};

/// One recorded driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Init(InitParams),
    SetCursor { x: u16, y: u16 },
    CursorOff,
    Reset,
    Swap { copy_framebuffer: bool },
    /// A swap reached the point where hardware would wait for retrace
    RetraceWait,
}

/// Driver that records calls and swaps without waiting
#[derive(Debug, Default)]
pub struct MockDriver {
    calls: Vec<DriverCall>,
    frames: Option<FrameStore>,
    fail_init: bool,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver whose `init` always fails
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[DriverCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Number of `set_cursor` calls recorded
    pub fn cursor_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::SetCursor { .. }))
            .count()
    }

    /// Number of times a swap waited for retrace
    pub fn retrace_waits(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DriverCall::RetraceWait))
            .count()
    }

    /// Most recent cursor position sent, if any
    pub fn last_cursor(&self) -> Option<(u16, u16)> {
        self.calls.iter().rev().find_map(|c| match c {
            DriverCall::SetCursor { x, y } => Some((*x, *y)),
            _ => None,
        })
    }

    pub fn front_buffer<T: Pod>(&self) -> Option<&[T]> {
        self.frames.as_ref()?.front()
    }
}

impl Driver for MockDriver {
    fn init(&mut self, params: &InitParams) -> Result<(), DriverError> {
        self.calls.push(DriverCall::Init(*params));
        if self.fail_init {
            return Err(DriverError::Rejected("mock configured to fail".to_string()));
        }
        if self.frames.is_some() {
            return Err(DriverError::AlreadyRunning);
        }
        self.frames = Some(FrameStore::new(params));
        Ok(())
    }

    fn back_buffer<T: Pod>(&self) -> Option<&[T]> {
        self.frames.as_ref()?.back()
    }

    fn back_buffer_mut<T: Pod>(&mut self) -> Option<&mut [T]> {
        self.frames.as_mut()?.back_mut()
    }

    fn palette_mut(&mut self) -> Option<&mut [u32; 256]> {
        self.frames.as_mut()?.palette_mut()
    }

    fn set_cursor(&mut self, x: u16, y: u16) {
        self.calls.push(DriverCall::SetCursor { x, y });
    }

    fn cursor_off(&mut self) {
        self.calls.push(DriverCall::CursorOff);
    }

    fn reset(&mut self) {
        self.calls.push(DriverCall::Reset);
        self.frames = None;
    }

    fn swap(&mut self, copy_framebuffer: bool) {
        self.calls.push(DriverCall::Swap { copy_framebuffer });
        if let Some(frames) = self.frames.as_mut() {
            if frames.params().double_buffered {
                self.calls.push(DriverCall::RetraceWait);
                frames.flip(copy_framebuffer);
            }
        }
    }
}
