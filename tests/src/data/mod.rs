use imagerd_common::api::{BuildRequest, SubtargetKey};

pub const DUMMY_DISTRO: &str = "openwrt";
pub const DUMMY_RELEASE: &str = "22.03";
pub const DUMMY_TARGET: &str = "ramips";
pub const DUMMY_SUBTARGET: &str = "mt7621";
pub const DUMMY_OTHER_SUBTARGET: &str = "mt7620";
pub const DUMMY_PROFILE: &str = "generic";
pub const DUMMY_NETWORK_PROFILE: &str = "dhcp";

pub const DUMMY_IMAGE_HASH: &str = "f00dfeedbeef";
pub const DUMMY_MANIFEST_HASH: &str = "0123456789ab";
pub const DUMMY_CHECKSUM: &str = "d6598f4a6c24ea4f0ed1fb2a69a86bc2";
pub const DUMMY_FILESIZE: i64 = 4_194_304;

pub fn dummy_packages() -> Vec<String> {
    vec!["curl".to_string(), "luci".to_string(), "vim".to_string()]
}

pub fn dummy_manifest_packages() -> Vec<(String, String)> {
    vec![
        ("curl".to_string(), "7.83.1".to_string()),
        ("luci".to_string(), "22.083.69138".to_string()),
        ("vim".to_string(), "8.2.4919".to_string()),
    ]
}

pub fn build_request(packages_hash: &str) -> BuildRequest {
    build_request_for_profile(DUMMY_PROFILE, packages_hash)
}

pub fn build_request_for_profile(profile: &str, packages_hash: &str) -> BuildRequest {
    BuildRequest {
        distro: DUMMY_DISTRO.to_string(),
        release: DUMMY_RELEASE.to_string(),
        target: DUMMY_TARGET.to_string(),
        subtarget: DUMMY_SUBTARGET.to_string(),
        profile: profile.to_string(),
        packages_hash: packages_hash.to_string(),
        network_profile: DUMMY_NETWORK_PROFILE.to_string(),
    }
}

pub fn subtarget_key() -> SubtargetKey {
    SubtargetKey {
        distro: DUMMY_DISTRO.to_string(),
        release: DUMMY_RELEASE.to_string(),
        target: DUMMY_TARGET.to_string(),
        subtarget: DUMMY_SUBTARGET.to_string(),
    }
}

pub fn other_subtarget_key() -> SubtargetKey {
    SubtargetKey {
        subtarget: DUMMY_OTHER_SUBTARGET.to_string(),
        ..subtarget_key()
    }
}
