//! Display panel trait
//!
//! The redraw scheduler decides *what* changed; a [`Panel`] decides how
//! it looks. Each call repaints one region completely.

use stomplink_protocol::DebugFields;

/// Errors a panel can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError {
    /// Bus transfer to the display failed
    Bus,
    /// Frame buffer is being flushed; try again later
    Busy,
}

/// Screen areas, one per displayed field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    Level,
    Delay,
    Reverb,
    Channel,
    MeterIn,
    MeterOut,
    Link,
    Debug,
}

impl Region {
    /// Every region, in redraw order
    pub const ALL: [Region; 8] = [
        Region::Level,
        Region::Delay,
        Region::Reverb,
        Region::Channel,
        Region::MeterIn,
        Region::MeterOut,
        Region::Link,
        Region::Debug,
    ];
}

/// What to show in a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Content<'a> {
    /// Value not known yet
    Placeholder,
    /// Plain number (level, channel)
    Number(u8),
    /// Effect on/off
    Toggle(bool),
    /// Lit meter segments
    Segments(u8),
    /// Link indicator, `true` when healthy
    Link(bool),
    /// Telemetry table
    Debug(&'a DebugFields),
}

/// A display that can repaint one region at a time
pub trait Panel {
    /// Repaint `region` with `content`
    fn draw(&mut self, region: Region, content: Content<'_>) -> Result<(), PanelError>;
}

impl<P: Panel + ?Sized> Panel for &mut P {
    fn draw(&mut self, region: Region, content: Content<'_>) -> Result<(), PanelError> {
        (**self).draw(region, content)
    }
}
