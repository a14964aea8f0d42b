// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod access_level;
pub mod equipment_type;
pub mod menu;
pub mod setting;
pub mod theme;
pub mod user;

pub use access_level::{AccessLevel, AccessLevelInput, ADMIN_LEVEL_ID};
pub use equipment_type::{EquipmentType, EquipmentTypeInput};
pub use menu::{
    build_menu_tree, MenuItem, MenuItemDetail, MenuItemFields, MenuItemInput, MenuNode, MenuOrderEntry,
};
pub use setting::{
    group_settings, NewSetting, Setting, SettingDetail, SettingFields, SettingKind, SettingUpdate,
};
pub use theme::{Theme, ThemeDetail, ThemeFields, ThemeInput};
pub use user::{NewUser, RefreshToken, User, UserSummary};
