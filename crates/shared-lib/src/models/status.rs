//! 业务状态枚举
//!
//! 数据库和接口中状态都以小写字符串存储，这里统一提供字符串互转和状态流转规则。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// 无法识别的状态字符串
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("无效的{kind}: {value}")]
pub struct ParseStatusError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// 所有可选值
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseStatusError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// 项目状态
///
/// `approved` 是旧版"项目申请"流程留下的状态，和 `active` 一样视为开放状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Active,
    Approved,
    Completed,
    Cancelled,
}

string_enum!(ProjectStatus, "项目状态", {
    Pending => "pending",
    Active => "active",
    Approved => "approved",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl ProjectStatus {
    /// 是否对普通用户可见并接受申请
    pub fn is_open(&self) -> bool {
        matches!(self, ProjectStatus::Active | ProjectStatus::Approved)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ProjectStatus::Completed | ProjectStatus::Cancelled)
    }

    /// 管理员可执行的状态流转
    pub fn can_transition_to(&self, target: ProjectStatus) -> bool {
        use ProjectStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                | (Pending, Approved)
                | (Approved, Active)
                | (Active, Completed)
                | (Approved, Completed)
                | (Pending, Cancelled)
                | (Active, Cancelled)
                | (Approved, Cancelled)
        )
    }
}

/// 申请状态
///
/// 只允许 `pending -> approved` 和 `pending -> rejected` 两种流转，两个目标状态都是终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

string_enum!(ApplicationStatus, "申请状态", {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationStatus::Pending)
    }

    /// 管理员审批时允许设置的目标状态
    pub fn is_decision(&self) -> bool {
        self.is_terminal()
    }
}

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

string_enum!(UserRole, "用户角色", {
    Admin => "admin",
    User => "user",
});

/// 用户状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Pending,
}

string_enum!(UserStatus, "用户状态", {
    Active => "active",
    Inactive => "inactive",
    Pending => "pending",
});
