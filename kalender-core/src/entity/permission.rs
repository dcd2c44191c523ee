//! Write permission state for a structure.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    WriteAllowed,
    NoRight,
    RequestPending,
}

impl PermissionState {
    /// Unknown codes are treated as no right.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => PermissionState::WriteAllowed,
            2 => PermissionState::RequestPending,
            _ => PermissionState::NoRight,
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            PermissionState::WriteAllowed => 0,
            PermissionState::NoRight => 1,
            PermissionState::RequestPending => 2,
        }
    }
}

/// Stateless value object; never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub state: PermissionState,
    pub text: String,
    pub kind: String,
}

impl Permission {
    pub fn has_write_permission(&self) -> bool {
        self.state == PermissionState::WriteAllowed
    }

    pub fn is_pending(&self) -> bool {
        self.state == PermissionState::RequestPending
    }
}
