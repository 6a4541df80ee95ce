use std::convert::TryFrom;
use std::fmt;

use crate::sys::*;

/// Common camera control identifiers.
///
/// The numeric values are the V4L2_CID_* constants from the kernel's
/// v4l2-controls.h. Not every device implements every control; querying or
/// setting an unsupported one fails with EINVAL.
#[allow(clippy::unreadable_literal)]
#[rustfmt::skip]
#[repr(u32)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    /* user class */
    Brightness              = 0x00980900,
    Contrast                = 0x00980901,
    Saturation              = 0x00980902,
    AutoWhiteBalance        = 0x0098090c,
    Gain                    = 0x00980913,
    WhiteBalanceTemperature = 0x0098091a,

    /* camera class */
    ExposureAuto            = 0x009a0901,
    ExposureAbsolute        = 0x009a0902,
    FocusAuto               = 0x009a090c,
}

impl From<Id> for u32 {
    fn from(id: Id) -> Self {
        id as u32
    }
}

/// Control data type
#[rustfmt::skip]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Type {
    Integer,
    Boolean,
    Menu,
    Button,
    Integer64,
    CtrlClass,
    String,
    Bitmask,
    IntegerMenu,

    Unknown(u32),
}

impl From<u32> for Type {
    fn from(repr: u32) -> Self {
        match repr {
            1 => Self::Integer,
            2 => Self::Boolean,
            3 => Self::Menu,
            4 => Self::Button,
            5 => Self::Integer64,
            6 => Self::CtrlClass,
            7 => Self::String,
            8 => Self::Bitmask,
            9 => Self::IntegerMenu,
            repr => Self::Unknown(repr),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u32 {
        const DISABLED          = 0x0001;
        const GRABBED           = 0x0002;
        const READ_ONLY         = 0x0004;
        const UPDATE            = 0x0008;
        const INACTIVE          = 0x0010;
        const SLIDER            = 0x0020;
        const WRITE_ONLY        = 0x0040;
        const VOLATILE          = 0x0080;
    }
}

impl From<u32> for Flags {
    fn from(flags: u32) -> Self {
        Self::from_bits_retain(flags)
    }
}

impl From<Flags> for u32 {
    fn from(flags: Flags) -> Self {
        flags.bits()
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug)]
/// Item of a menu control
pub enum MenuItem {
    Name(String),
    Value(i64),
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Name(name) => write!(f, "{}", name),
            MenuItem::Value(value) => write!(f, "{}", value),
        }
    }
}

impl TryFrom<(Type, v4l2_querymenu)> for MenuItem {
    type Error = ();

    fn try_from(item: (Type, v4l2_querymenu)) -> Result<Self, Self::Error> {
        unsafe {
            match item.0 {
                Type::Menu => Ok(MenuItem::Name(
                    String::from_utf8_lossy(&item.1.__bindgen_anon_1.name)
                        .trim_matches(char::from(0))
                        .to_string(),
                )),
                Type::IntegerMenu => Ok(MenuItem::Value(item.1.__bindgen_anon_1.value)),
                _ => Err(()),
            }
        }
    }
}

#[derive(Debug)]
/// Control description as reported by VIDIOC_QUERYCTRL
pub struct Description {
    /// Control identifier
    pub id: u32,
    /// Type of control
    pub typ: Type,
    /// Name of the control, intended for the user
    pub name: String,
    /// Minimum value, inclusive
    pub minimum: i32,
    /// Maximum value, inclusive
    pub maximum: i32,
    /// Step size, always positive
    pub step: i32,
    /// Default value
    pub default: i32,
    /// Control flags
    pub flags: Flags,

    /// Items for menu controls (only valid if typ is a menu type)
    pub items: Option<Vec<(u32, MenuItem)>>,
}

impl From<v4l2_queryctrl> for Description {
    fn from(ctrl: v4l2_queryctrl) -> Self {
        Description {
            id: ctrl.id,
            typ: Type::from(ctrl.type_),
            name: String::from_utf8_lossy(&ctrl.name)
                .trim_matches(char::from(0))
                .to_string(),
            minimum: ctrl.minimum,
            maximum: ctrl.maximum,
            step: ctrl.step,
            default: ctrl.default_value,
            flags: Flags::from(ctrl.flags),
            items: None,
        }
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID      : {:#010x}", self.id)?;
        writeln!(f, "Type    : {}", self.typ)?;
        writeln!(f, "Name    : {}", self.name)?;
        writeln!(f, "Minimum : {}", self.minimum)?;
        writeln!(f, "Maximum : {}", self.maximum)?;
        writeln!(f, "Step    : {}", self.step)?;
        writeln!(f, "Default : {}", self.default)?;
        writeln!(f, "Flags   : {}", self.flags)?;
        if let Some(items) = &self.items {
            writeln!(f, "Menu ==>")?;
            for item in items {
                writeln!(f, " * {}", item.1)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_values() {
        assert_eq!(u32::from(Id::AutoWhiteBalance), 0x0098_090c);
        assert_eq!(u32::from(Id::ExposureAbsolute), 0x009a_0902);
    }

    #[test]
    fn type_from_repr() {
        assert_eq!(Type::from(2), Type::Boolean);
        assert_eq!(Type::from(9), Type::IntegerMenu);
        assert_eq!(Type::from(0x0100), Type::Unknown(0x0100));
    }
}
