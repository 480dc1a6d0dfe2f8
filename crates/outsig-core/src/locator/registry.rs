//! Registry-backed signature lookup.
//!
//! Outlook stores the selected signature name under
//! `HKCU\Software\Microsoft\Office\{version}\Common\MailSettings`
//! (value `NewSignature`), or per mail profile under
//! `HKCU\Software\Microsoft\Office\{version}\Outlook\Profiles\{profile}`
//! (value `New Signature`).

use super::SignatureStore;
use crate::error::Result;

const MAIL_SETTINGS_VALUE: &str = "NewSignature";
const PROFILE_SIGNATURE_VALUE: &str = "New Signature";

/// Signature lookup against the current user's registry hive.
///
/// Every operation fails with a platform-capability error on
/// non-Windows targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrySignatureStore;

impl RegistrySignatureStore {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureStore for RegistrySignatureStore {
    fn mail_settings_signature(&self, version: &str) -> Result<Option<String>> {
        let subkey = format!(r"Software\Microsoft\Office\{version}\Common\MailSettings");
        read_user_string_value(&subkey, MAIL_SETTINGS_VALUE)
    }

    fn profile_signature(&self, version: &str) -> Result<Option<String>> {
        let profiles_key = format!(r"Software\Microsoft\Office\{version}\Outlook\Profiles");
        for profile in enumerate_subkeys(&profiles_key)? {
            let profile_key = format!(r"{profiles_key}\{profile}");
            if let Some(name) = read_user_string_value(&profile_key, PROFILE_SIGNATURE_VALUE)? {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }
}

/// Read a REG_SZ value under HKEY_CURRENT_USER.
///
/// Missing keys or values are `Ok(None)`; empty strings normalize to
/// `None` as well, matching how Outlook clears the setting.
#[cfg(target_os = "windows")]
fn read_user_string_value(subkey: &str, value: &str) -> Result<Option<String>> {
    use windows::Win32::Foundation::ERROR_FILE_NOT_FOUND;
    use windows::Win32::System::Registry::{HKEY_CURRENT_USER, RRF_RT_REG_SZ, RegGetValueW};
    use windows::core::HSTRING;

    use crate::error::Error;

    let subkey_name = HSTRING::from(subkey);
    let value_name = HSTRING::from(value);

    // First call to get the required buffer size
    let mut size: u32 = 0;
    // SAFETY: RegGetValueW with a null buffer queries the required size.
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            &subkey_name,
            &value_name,
            RRF_RT_REG_SZ,
            None,
            None,
            Some(&mut size),
        )
    };
    if status == ERROR_FILE_NOT_FOUND {
        return Ok(None);
    }
    status.ok().map_err(|e| Error::Registry {
        key: format!(r"{subkey}\{value}"),
        message: e.to_string(),
    })?;

    if size == 0 {
        return Ok(None);
    }

    let mut buffer = vec![0u16; size.div_ceil(2) as usize];
    // SAFETY: RegGetValueW reads the registry value into the provided buffer.
    let status = unsafe {
        RegGetValueW(
            HKEY_CURRENT_USER,
            &subkey_name,
            &value_name,
            RRF_RT_REG_SZ,
            None,
            Some(buffer.as_mut_ptr().cast()),
            Some(&mut size),
        )
    };
    if status == ERROR_FILE_NOT_FOUND {
        return Ok(None);
    }
    status.ok().map_err(|e| Error::Registry {
        key: format!(r"{subkey}\{value}"),
        message: e.to_string(),
    })?;

    // Trim null terminators
    while buffer.last() == Some(&0) {
        buffer.pop();
    }

    let name = String::from_utf16(&buffer).map_err(|e| Error::Registry {
        key: format!(r"{subkey}\{value}"),
        message: format!("invalid UTF-16 in registry value: {e}"),
    })?;

    Ok((!name.is_empty()).then_some(name))
}

/// Enumerate the subkey names of a key under HKEY_CURRENT_USER.
///
/// A missing key yields an empty list.
#[cfg(target_os = "windows")]
fn enumerate_subkeys(subkey: &str) -> Result<Vec<String>> {
    use windows::Win32::Foundation::{ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS};
    use windows::Win32::System::Registry::{
        HKEY, HKEY_CURRENT_USER, KEY_READ, RegCloseKey, RegEnumKeyExW, RegOpenKeyExW,
    };
    use windows::core::{HSTRING, PWSTR};

    use crate::error::Error;

    let subkey_name = HSTRING::from(subkey);
    let mut key = HKEY::default();
    // SAFETY: RegOpenKeyExW writes the opened key handle into `key`.
    let status = unsafe { RegOpenKeyExW(HKEY_CURRENT_USER, &subkey_name, 0, KEY_READ, &mut key) };
    if status == ERROR_FILE_NOT_FOUND {
        return Ok(Vec::new());
    }
    status.ok().map_err(|e| Error::Registry {
        key: subkey.to_string(),
        message: e.to_string(),
    })?;

    let mut names = Vec::new();
    let mut index = 0u32;
    loop {
        // Registry key names are capped at 255 characters.
        let mut name = [0u16; 256];
        let mut len = name.len() as u32;
        // SAFETY: RegEnumKeyExW writes at most `len` characters into `name`.
        let status = unsafe {
            RegEnumKeyExW(
                key,
                index,
                PWSTR(name.as_mut_ptr()),
                &mut len,
                None,
                PWSTR::null(),
                None,
                None,
            )
        };
        if status == ERROR_NO_MORE_ITEMS {
            break;
        }
        if let Err(e) = status.ok() {
            // SAFETY: `key` was opened above and is closed exactly once.
            unsafe {
                let _ = RegCloseKey(key);
            }
            return Err(Error::Registry {
                key: subkey.to_string(),
                message: e.to_string(),
            });
        }

        names.push(String::from_utf16_lossy(&name[..len as usize]));
        index += 1;
    }

    // SAFETY: `key` was opened above and is closed exactly once.
    unsafe {
        let _ = RegCloseKey(key);
    }

    Ok(names)
}

#[cfg(not(target_os = "windows"))]
fn read_user_string_value(_subkey: &str, _value: &str) -> Result<Option<String>> {
    Err(crate::error::Error::UnsupportedPlatform)
}

#[cfg(not(target_os = "windows"))]
fn enumerate_subkeys(_subkey: &str) -> Result<Vec<String>> {
    Err(crate::error::Error::UnsupportedPlatform)
}
