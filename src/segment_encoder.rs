use anyhow::Result;

use crate::segments::Segment;

/// Serializes segments into a subtitle format, one at a time.
pub trait SegmentEncoder {
    fn write_segment(&mut self, seg: &Segment) -> Result<()>;

    /// Flush buffered output. Must be idempotent.
    fn close(&mut self) -> Result<()>;

    /// Write every segment in order, then close.
    fn write_all_segments(&mut self, segments: &[Segment]) -> Result<()> {
        for seg in segments {
            self.write_segment(seg)?;
        }
        self.close()
    }
}
