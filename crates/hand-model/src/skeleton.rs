//! Anatomical constants: joints, bones and degrees of freedom.
//!
//! Every identifier here has a stable integer index. Output tensors are laid
//! out in [`Joint`] index order and input tensors in [`Dof`] index order, so
//! these indices are part of the external interface.
//!
//! # Hierarchy
//!
//! The palm center is the root. Wrist left, wrist middle, the thumb MCP and
//! the four finger MCPs hang off the palm; each finger then continues as a
//! simple chain out to its tip.

/// Number of modelled joints.
pub const JOINT_COUNT: usize = 31;

/// Number of degrees of freedom in an input row.
pub const DOF_COUNT: usize = 47;

/// Number of parent-child bone segments.
pub const BONE_COUNT: usize = 30;

/// Number of DoFs that are trainable in the reference configuration.
pub const FREE_DOF_COUNT: usize = 26;

/// Width of one flattened row of joint positions (`x, y, z` per joint).
pub const POSITION_WIDTH: usize = JOINT_COUNT * 3;

/// Coordinate axis of an elementary rotation or translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The X axis.
    X,
    /// The Y axis.
    Y,
    /// The Z axis.
    Z,
}

impl Axis {
    /// Row of the homogeneous matrix that carries this axis' translation.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// A named anatomical point of the hand.
///
/// Discriminants are the joint ids used for output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Joint {
    LittleTip = 0,
    LittleDip,
    LittlePipSecond,
    LittlePipFirst,
    LittleBase,
    RingTip,
    RingDip,
    RingPipSecond,
    RingPipFirst,
    RingBase,
    MiddleTip,
    MiddleDip,
    MiddlePipSecond,
    MiddlePipFirst,
    MiddleBase,
    IndexTip,
    IndexDip,
    IndexPipSecond,
    IndexPipFirst,
    IndexBase,
    LittleMcp,
    RingMcp,
    MiddleMcp,
    IndexMcp,
    PalmCenter,
    WristLeft,
    WristMiddle,
    ThumbMcp,
    ThumbPip,
    ThumbDip,
    ThumbTip,
}

/// The four non-thumb fingers, in reference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Finger {
    Little = 0,
    Ring,
    Middle,
    Index,
}

impl Finger {
    /// All four non-thumb fingers.
    pub const ALL: [Self; 4] = [Self::Little, Self::Ring, Self::Middle, Self::Index];

    const fn offset(self) -> usize {
        self as usize
    }
}

impl Joint {
    /// Every joint, in id order.
    pub const ALL: [Self; JOINT_COUNT] = [
        Self::LittleTip,
        Self::LittleDip,
        Self::LittlePipSecond,
        Self::LittlePipFirst,
        Self::LittleBase,
        Self::RingTip,
        Self::RingDip,
        Self::RingPipSecond,
        Self::RingPipFirst,
        Self::RingBase,
        Self::MiddleTip,
        Self::MiddleDip,
        Self::MiddlePipSecond,
        Self::MiddlePipFirst,
        Self::MiddleBase,
        Self::IndexTip,
        Self::IndexDip,
        Self::IndexPipSecond,
        Self::IndexPipFirst,
        Self::IndexBase,
        Self::LittleMcp,
        Self::RingMcp,
        Self::MiddleMcp,
        Self::IndexMcp,
        Self::PalmCenter,
        Self::WristLeft,
        Self::WristMiddle,
        Self::ThumbMcp,
        Self::ThumbPip,
        Self::ThumbDip,
        Self::ThumbTip,
    ];

    /// Topological evaluation order: every joint appears after its parent.
    pub const FORWARD_ORDER: [Self; JOINT_COUNT] = [
        Self::PalmCenter,
        Self::WristLeft,
        Self::WristMiddle,
        Self::ThumbMcp,
        Self::ThumbPip,
        Self::ThumbDip,
        Self::ThumbTip,
        Self::LittleMcp,
        Self::RingMcp,
        Self::MiddleMcp,
        Self::IndexMcp,
        Self::LittleBase,
        Self::LittlePipFirst,
        Self::LittlePipSecond,
        Self::LittleDip,
        Self::LittleTip,
        Self::RingBase,
        Self::RingPipFirst,
        Self::RingPipSecond,
        Self::RingDip,
        Self::RingTip,
        Self::MiddleBase,
        Self::MiddlePipFirst,
        Self::MiddlePipSecond,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::IndexBase,
        Self::IndexPipFirst,
        Self::IndexPipSecond,
        Self::IndexDip,
        Self::IndexTip,
    ];

    /// Stable joint id.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a joint by id.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Snake-case name of the joint.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LittleTip => "little_finger_tip",
            Self::LittleDip => "little_finger_dip",
            Self::LittlePipSecond => "little_finger_pip_second",
            Self::LittlePipFirst => "little_finger_pip_first",
            Self::LittleBase => "little_finger_base",
            Self::RingTip => "ring_finger_tip",
            Self::RingDip => "ring_finger_dip",
            Self::RingPipSecond => "ring_finger_pip_second",
            Self::RingPipFirst => "ring_finger_pip_first",
            Self::RingBase => "ring_finger_base",
            Self::MiddleTip => "middle_finger_tip",
            Self::MiddleDip => "middle_finger_dip",
            Self::MiddlePipSecond => "middle_finger_pip_second",
            Self::MiddlePipFirst => "middle_finger_pip_first",
            Self::MiddleBase => "middle_finger_base",
            Self::IndexTip => "index_finger_tip",
            Self::IndexDip => "index_finger_dip",
            Self::IndexPipSecond => "index_finger_pip_second",
            Self::IndexPipFirst => "index_finger_pip_first",
            Self::IndexBase => "index_finger_base",
            Self::LittleMcp => "little_finger_mcp",
            Self::RingMcp => "ring_finger_mcp",
            Self::MiddleMcp => "middle_finger_mcp",
            Self::IndexMcp => "index_finger_mcp",
            Self::PalmCenter => "palm_center",
            Self::WristLeft => "wrist_left",
            Self::WristMiddle => "wrist_middle",
            Self::ThumbMcp => "thumb_mcp",
            Self::ThumbPip => "thumb_pip",
            Self::ThumbDip => "thumb_dip",
            Self::ThumbTip => "thumb_tip",
        }
    }

    /// The joint this one is attached to, `None` for the palm center.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        let parent = match self {
            Self::PalmCenter => return None,
            Self::WristLeft
            | Self::WristMiddle
            | Self::ThumbMcp
            | Self::LittleMcp
            | Self::RingMcp
            | Self::MiddleMcp
            | Self::IndexMcp => Self::PalmCenter,
            Self::ThumbPip => Self::ThumbMcp,
            Self::ThumbDip => Self::ThumbPip,
            Self::ThumbTip => Self::ThumbDip,
            Self::LittleBase => Self::LittleMcp,
            Self::RingBase => Self::RingMcp,
            Self::MiddleBase => Self::MiddleMcp,
            Self::IndexBase => Self::IndexMcp,
            Self::LittlePipFirst => Self::LittleBase,
            Self::RingPipFirst => Self::RingBase,
            Self::MiddlePipFirst => Self::MiddleBase,
            Self::IndexPipFirst => Self::IndexBase,
            Self::LittlePipSecond => Self::LittlePipFirst,
            Self::RingPipSecond => Self::RingPipFirst,
            Self::MiddlePipSecond => Self::MiddlePipFirst,
            Self::IndexPipSecond => Self::IndexPipFirst,
            Self::LittleDip => Self::LittlePipSecond,
            Self::RingDip => Self::RingPipSecond,
            Self::MiddleDip => Self::MiddlePipSecond,
            Self::IndexDip => Self::IndexPipSecond,
            Self::LittleTip => Self::LittleDip,
            Self::RingTip => Self::RingDip,
            Self::MiddleTip => Self::MiddleDip,
            Self::IndexTip => Self::IndexDip,
        };
        Some(parent)
    }

    /// The bone connecting this joint to its parent.
    #[must_use]
    pub const fn bone(self) -> Option<Bone> {
        let bone = match self {
            Self::PalmCenter => return None,
            Self::WristLeft => Bone::PalmToWristLeft,
            Self::WristMiddle => Bone::PalmToWristMiddle,
            Self::ThumbMcp => Bone::PalmToThumbMcp,
            Self::ThumbPip => Bone::ThumbMcpToPip,
            Self::ThumbDip => Bone::ThumbPipToDip,
            Self::ThumbTip => Bone::ThumbDipToTip,
            Self::LittleMcp => Bone::LittleMcpToPalm,
            Self::RingMcp => Bone::RingMcpToPalm,
            Self::MiddleMcp => Bone::MiddleMcpToPalm,
            Self::IndexMcp => Bone::IndexMcpToPalm,
            // Finger joints 0..20 share their index with the bone above them.
            finger => Bone::ALL[finger as usize],
        };
        Some(bone)
    }
}

/// A rigid segment between a joint and its parent.
///
/// Discriminants index the bone length table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Bone {
    LittleTipToDip = 0,
    LittleDipToPipSecond,
    LittlePipSecondToPipFirst,
    LittlePipFirstToBase,
    LittleBaseToMcp,
    RingTipToDip,
    RingDipToPipSecond,
    RingPipSecondToPipFirst,
    RingPipFirstToBase,
    RingBaseToMcp,
    MiddleTipToDip,
    MiddleDipToPipSecond,
    MiddlePipSecondToPipFirst,
    MiddlePipFirstToBase,
    MiddleBaseToMcp,
    IndexTipToDip,
    IndexDipToPipSecond,
    IndexPipSecondToPipFirst,
    IndexPipFirstToBase,
    IndexBaseToMcp,
    LittleMcpToPalm,
    RingMcpToPalm,
    MiddleMcpToPalm,
    IndexMcpToPalm,
    PalmToWristLeft,
    PalmToWristMiddle,
    PalmToThumbMcp,
    ThumbMcpToPip,
    ThumbPipToDip,
    ThumbDipToTip,
}

impl Bone {
    /// Every bone, in table order.
    pub const ALL: [Self; BONE_COUNT] = [
        Self::LittleTipToDip,
        Self::LittleDipToPipSecond,
        Self::LittlePipSecondToPipFirst,
        Self::LittlePipFirstToBase,
        Self::LittleBaseToMcp,
        Self::RingTipToDip,
        Self::RingDipToPipSecond,
        Self::RingPipSecondToPipFirst,
        Self::RingPipFirstToBase,
        Self::RingBaseToMcp,
        Self::MiddleTipToDip,
        Self::MiddleDipToPipSecond,
        Self::MiddlePipSecondToPipFirst,
        Self::MiddlePipFirstToBase,
        Self::MiddleBaseToMcp,
        Self::IndexTipToDip,
        Self::IndexDipToPipSecond,
        Self::IndexPipSecondToPipFirst,
        Self::IndexPipFirstToBase,
        Self::IndexBaseToMcp,
        Self::LittleMcpToPalm,
        Self::RingMcpToPalm,
        Self::MiddleMcpToPalm,
        Self::IndexMcpToPalm,
        Self::PalmToWristLeft,
        Self::PalmToWristMiddle,
        Self::PalmToThumbMcp,
        Self::ThumbMcpToPip,
        Self::ThumbPipToDip,
        Self::ThumbDipToTip,
    ];

    /// Index into the bone length table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a bone by table index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Local axis along which the rest translation of this bone is applied.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::ThumbMcpToPip | Self::ThumbPipToDip | Self::ThumbDipToTip => Axis::X,
            _ => Axis::Y,
        }
    }

    /// Sign of the rest translation along [`Bone::axis`].
    ///
    /// The wrist points and the thumb MCP sit below the palm center.
    #[must_use]
    pub const fn direction(self) -> f64 {
        match self {
            Self::PalmToWristLeft | Self::PalmToWristMiddle | Self::PalmToThumbMcp => -1.0,
            _ => 1.0,
        }
    }
}

/// One scalar pose parameter.
///
/// Discriminants are the column indices of an input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum Dof {
    GlobalTransX = 0,
    GlobalTransY,
    GlobalTransZ,
    GlobalRotX,
    GlobalRotY,
    GlobalRotZ,
    WristLeftRotX,
    WristLeftRotY,
    WristLeftRotZ,
    WristMiddleRotX,
    WristMiddleRotY,
    WristMiddleRotZ,
    ThumbMcpRotX,
    ThumbMcpRotY,
    ThumbMcpRotZ,
    ThumbPipRotY,
    ThumbPipRotZ,
    ThumbDipRotZ,
    ThumbTipRotZ,
    LittleMcpRotX,
    LittleMcpRotY,
    LittleMcpRotZ,
    RingMcpRotX,
    RingMcpRotY,
    RingMcpRotZ,
    MiddleMcpRotX,
    MiddleMcpRotY,
    MiddleMcpRotZ,
    IndexMcpRotX,
    IndexMcpRotY,
    IndexMcpRotZ,
    LittleBaseRotX,
    LittleBaseRotZ,
    LittlePipRotX,
    LittleDipRotX,
    RingBaseRotX,
    RingBaseRotZ,
    RingPipRotX,
    RingDipRotX,
    MiddleBaseRotX,
    MiddleBaseRotZ,
    MiddlePipRotX,
    MiddleDipRotX,
    IndexBaseRotX,
    IndexBaseRotZ,
    IndexPipRotX,
    IndexDipRotX,
}

impl Dof {
    /// Every DoF, in column order.
    pub const ALL: [Self; DOF_COUNT] = [
        Self::GlobalTransX,
        Self::GlobalTransY,
        Self::GlobalTransZ,
        Self::GlobalRotX,
        Self::GlobalRotY,
        Self::GlobalRotZ,
        Self::WristLeftRotX,
        Self::WristLeftRotY,
        Self::WristLeftRotZ,
        Self::WristMiddleRotX,
        Self::WristMiddleRotY,
        Self::WristMiddleRotZ,
        Self::ThumbMcpRotX,
        Self::ThumbMcpRotY,
        Self::ThumbMcpRotZ,
        Self::ThumbPipRotY,
        Self::ThumbPipRotZ,
        Self::ThumbDipRotZ,
        Self::ThumbTipRotZ,
        Self::LittleMcpRotX,
        Self::LittleMcpRotY,
        Self::LittleMcpRotZ,
        Self::RingMcpRotX,
        Self::RingMcpRotY,
        Self::RingMcpRotZ,
        Self::MiddleMcpRotX,
        Self::MiddleMcpRotY,
        Self::MiddleMcpRotZ,
        Self::IndexMcpRotX,
        Self::IndexMcpRotY,
        Self::IndexMcpRotZ,
        Self::LittleBaseRotX,
        Self::LittleBaseRotZ,
        Self::LittlePipRotX,
        Self::LittleDipRotX,
        Self::RingBaseRotX,
        Self::RingBaseRotZ,
        Self::RingPipRotX,
        Self::RingDipRotX,
        Self::MiddleBaseRotX,
        Self::MiddleBaseRotZ,
        Self::MiddlePipRotX,
        Self::MiddleDipRotX,
        Self::IndexBaseRotX,
        Self::IndexBaseRotZ,
        Self::IndexPipRotX,
        Self::IndexDipRotX,
    ];

    /// Column index in an input row.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a DoF by column index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Whether this DoF only exists to hold a palm joint rigidly in place.
    ///
    /// These are columns 6..=14 and 19..=30, fixed in the reference
    /// configuration.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        matches!(self as usize, 6..=14 | 19..=30)
    }

    /// Whether this DoF is a global translation rather than an angle.
    #[must_use]
    pub const fn is_translation(self) -> bool {
        matches!(
            self,
            Self::GlobalTransX | Self::GlobalTransY | Self::GlobalTransZ
        )
    }

    /// Structural rotation of a finger MCP about `axis`.
    #[must_use]
    pub const fn mcp_rotation(finger: Finger, axis: Axis) -> Self {
        Self::ALL[19 + finger.offset() * 3 + axis.index()]
    }

    /// Base rotation about X of a non-thumb finger.
    #[must_use]
    pub const fn base_rot_x(finger: Finger) -> Self {
        Self::ALL[31 + finger.offset() * 4]
    }

    /// Base rotation about Z of a non-thumb finger.
    #[must_use]
    pub const fn base_rot_z(finger: Finger) -> Self {
        Self::ALL[32 + finger.offset() * 4]
    }

    /// PIP flexion of a non-thumb finger.
    #[must_use]
    pub const fn pip_rot_x(finger: Finger) -> Self {
        Self::ALL[33 + finger.offset() * 4]
    }

    /// DIP flexion of a non-thumb finger.
    #[must_use]
    pub const fn dip_rot_x(finger: Finger) -> Self {
        Self::ALL[34 + finger.offset() * 4]
    }
}
