//! Registry access for path detectors.

/// Reads string values from a hierarchical key store.
///
/// Keys are full registry paths such as
/// `HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\VisualStudio\14.0`.
pub trait RegistryReader: Send + Sync {
    /// The string stored under `value` in `key`, if both exist.
    fn read_string(&self, key: &str, value: &str) -> Option<String>;
}

/// The Windows registry. On other platforms every lookup finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRegistry;

#[cfg(target_os = "windows")]
impl RegistryReader for SystemRegistry {
    fn read_string(&self, key: &str, value: &str) -> Option<String> {
        use windows::Win32::Foundation::ERROR_SUCCESS;
        use windows::Win32::System::Registry::{
            HKEY, HKEY_CLASSES_ROOT, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, HKEY_USERS, RRF_RT_REG_SZ,
            RegGetValueW,
        };
        use windows::core::HSTRING;

        let (hive, subkey) = key.split_once('\\')?;
        let hive: HKEY = match hive {
            "HKEY_LOCAL_MACHINE" | "HKLM" => HKEY_LOCAL_MACHINE,
            "HKEY_CURRENT_USER" | "HKCU" => HKEY_CURRENT_USER,
            "HKEY_CLASSES_ROOT" | "HKCR" => HKEY_CLASSES_ROOT,
            "HKEY_USERS" | "HKU" => HKEY_USERS,
            _ => return None,
        };
        let subkey = HSTRING::from(subkey);
        let value = HSTRING::from(value);

        let mut size: u32 = 0;
        // SAFETY: both names are valid null-terminated wide strings that
        // outlive the call, and only the size out-parameter is passed.
        let status = unsafe { RegGetValueW(hive, &subkey, &value, RRF_RT_REG_SZ, None, None, Some(&mut size as *mut u32)) };
        if status != ERROR_SUCCESS || size == 0 {
            return None;
        }

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        // SAFETY: `buffer` holds at least `size` bytes and `size` tells the
        // API how much it may write.
        let status = unsafe {
            RegGetValueW(
                hive,
                &subkey,
                &value,
                RRF_RT_REG_SZ,
                None,
                Some(buffer.as_mut_ptr().cast()),
                Some(&mut size as *mut u32),
            )
        };
        if status != ERROR_SUCCESS {
            return None;
        }

        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        Some(String::from_utf16_lossy(&buffer[..len]))
    }
}

#[cfg(not(target_os = "windows"))]
impl RegistryReader for SystemRegistry {
    fn read_string(&self, _key: &str, _value: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::RegistryReader;

    /// In-memory registry for detector tests.
    #[derive(Debug, Default)]
    pub(crate) struct FakeRegistry {
        values: HashMap<(String, String), String>,
    }

    impl FakeRegistry {
        pub(crate) fn with(mut self, key: &str, value: &str, data: impl Into<String>) -> Self {
            self.values.insert((key.to_string(), value.to_string()), data.into());
            self
        }
    }

    impl RegistryReader for FakeRegistry {
        fn read_string(&self, key: &str, value: &str) -> Option<String> {
            self.values.get(&(key.to_string(), value.to_string())).cloned()
        }
    }
}
