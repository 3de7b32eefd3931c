use crate::config::AccessPolicy;
use anyhow::{Context, Result, anyhow};
use nix::unistd::{Gid, Group, Uid, User, chown};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

fn resolve_uid(owner: &str) -> Result<Uid> {
    User::from_name(owner)
        .with_context(|| format!("無法查詢使用者: {owner}"))?
        .map(|user| user.uid)
        .ok_or_else(|| anyhow!("使用者不存在: {owner}"))
}

fn resolve_gid(group: &str) -> Result<Gid> {
    Group::from_name(group)
        .with_context(|| format!("無法查詢群組: {group}"))?
        .map(|group| group.gid)
        .ok_or_else(|| anyhow!("群組不存在: {group}"))
}

/// 設定擁有者、群組與權限
///
/// 未設定擁有者或群組時只變更權限。
pub fn set_attributes(path: &Path, policy: &AccessPolicy, mode: u32) -> Result<()> {
    let uid = policy.owner.as_deref().map(resolve_uid).transpose()?;
    let gid = policy.group.as_deref().map(resolve_gid).transpose()?;

    if uid.is_some() || gid.is_some() {
        chown(path, uid, gid).with_context(|| format!("chown 失敗: {}", path.display()))?;
    }

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("chmod 失敗: {}", path.display()))?;

    Ok(())
}
