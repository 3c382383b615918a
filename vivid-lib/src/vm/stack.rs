use derive_more::{Deref, From};
use im::Vector as ImVec;
use serde::{Deserialize, Serialize};

/// the strings produced by a single instruction
pub type Frame = Vec<String>;

/// The memory of the vm. Every data producing instruction puts a new frame on top, nothing is
/// ever popped during a run. The top frame is the current working set.
///
/// Uses an immutable vector under the hood, so handing out a snapshot after every step is
/// cheap, the snapshots share structure with the live stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref, From)]
pub struct Stack(ImVec<Frame>);

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    /// the most recent frame, empty if nothing was pushed yet
    pub fn top(&self) -> &[String] {
        self.0.last().map(Vec::as_slice).unwrap_or(&[])
    }

    /// returns the stack with `frame` on top of it
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.0.push_back(frame);
        self
    }

    /// pushes a frame that holds `f` applied to every string of the top frame
    pub fn map_top<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let frame = self.top().iter().map(|s| f(s.as_str())).collect();
        self.with_frame(frame)
    }

    /// pushes a frame that holds the strings of the top frame that satisfy `pred`
    pub fn filter_top<P>(self, mut pred: P) -> Self
    where
        P: FnMut(&str) -> bool,
    {
        let frame = self
            .top()
            .iter()
            .filter(|s| pred(s.as_str()))
            .cloned()
            .collect();
        self.with_frame(frame)
    }
}

impl FromIterator<Frame> for Stack {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Stack(iter.into_iter().collect())
    }
}
