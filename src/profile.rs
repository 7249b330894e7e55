//! Player profile: coins, skins and the cosmetic weather pick
//!
//! Persisted to LocalStorage on wasm32 as a versioned JSON document.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_COINS;
use crate::error::{EconomyError, ProfileError};
use crate::session::Wallet;
use crate::sim::Weather;

/// Save format version written by this build
pub const PROFILE_VERSION: u32 = 1;

/// Skin every profile starts with
pub const DEFAULT_SKIN: &str = "chicken_default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkinTier {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl SkinTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkinTier::Common => "Common",
            SkinTier::Rare => "Rare",
            SkinTier::Epic => "Epic",
            SkinTier::Legendary => "Legendary",
            SkinTier::Mythic => "Mythic",
        }
    }
}

/// A purchasable cosmetic; no gameplay effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skin {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub tier: SkinTier,
}

const fn skin(id: &'static str, name: &'static str, price: u64, tier: SkinTier) -> Skin {
    Skin {
        id,
        name,
        price,
        tier,
    }
}

pub const SKINS: &[Skin] = &[
    skin(DEFAULT_SKIN, "Original", 0, SkinTier::Common),
    skin("chicken_blue", "Blueberry", 500, SkinTier::Common),
    skin("chicken_red", "Cherry", 500, SkinTier::Common),
    skin("chicken_mint", "Mint", 500, SkinTier::Common),
    skin("chicken_lemon", "Lemonade", 500, SkinTier::Common),
    skin("chicken_grape", "Grape", 500, SkinTier::Common),
    skin("chicken_banana", "Banana", 500, SkinTier::Common),
    skin("chicken_tangerine", "Tangerine", 500, SkinTier::Common),
    skin("chicken_dark", "Shadow", 2500, SkinTier::Rare),
    skin("chicken_punk", "Punk", 3500, SkinTier::Rare),
    skin("chicken_business", "Corporate", 4500, SkinTier::Rare),
    skin("chicken_camo", "Commando", 3000, SkinTier::Rare),
    skin("chicken_cow", "Moo-Moo", 4000, SkinTier::Rare),
    skin("chicken_sherlock", "Sherlock", 3500, SkinTier::Rare),
    skin("chicken_farmer", "Farmer", 3000, SkinTier::Rare),
    skin("chicken_zombie", "Undead", 10_000, SkinTier::Epic),
    skin("chicken_vampire", "Count Cluck", 12_000, SkinTier::Epic),
    skin("chicken_robo", "Mecha-01", 15_000, SkinTier::Epic),
    skin("chicken_diver", "Scuba Cluck", 13_500, SkinTier::Epic),
    skin("chicken_prisoner", "Jailbird", 11_000, SkinTier::Epic),
    skin("chicken_cop", "Officer", 12_000, SkinTier::Epic),
    skin("chicken_chef", "Chef", 11_000, SkinTier::Epic),
    skin("chicken_ninja", "Shinobi", 35_000, SkinTier::Legendary),
    skin("chicken_king", "The King", 50_000, SkinTier::Legendary),
    skin("chicken_wizard", "Ganduck", 65_000, SkinTier::Legendary),
    skin("chicken_knight", "Sir Clucks-a-Lot", 45_000, SkinTier::Legendary),
    skin("chicken_santa", "Festive", 55_000, SkinTier::Legendary),
    skin("chicken_viking", "Valhalla", 45_000, SkinTier::Legendary),
    skin("chicken_pharaoh", "Pharaoh", 60_000, SkinTier::Legendary),
    skin("chicken_alien", "Invader", 120_000, SkinTier::Mythic),
    skin("chicken_void", "The Void", 250_000, SkinTier::Mythic),
    skin("chicken_gold", "Midas Touch", 1_000_000, SkinTier::Mythic),
    skin("chicken_cyber", "Cyberpunk", 150_000, SkinTier::Mythic),
    skin("chicken_ghost", "Poltergeist", 300_000, SkinTier::Mythic),
    skin("chicken_cosmic", "Cosmic", 150_000, SkinTier::Mythic),
    skin("chicken_glitch", "MissingNo", 200_000, SkinTier::Mythic),
];

/// Look up a skin by id
pub fn find_skin(id: &str) -> Option<&'static Skin> {
    SKINS.iter().find(|s| s.id == id)
}

/// Shop listing, cheapest first
pub fn catalog() -> Vec<&'static Skin> {
    let mut skins: Vec<_> = SKINS.iter().collect();
    skins.sort_by_key(|s| s.price);
    skins
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub version: u32,
    pub coins: u64,
    pub owned: BTreeSet<String>,
    pub equipped: String,
    /// Pinned weather, `None` to cycle
    #[serde(default)]
    pub weather: Option<Weather>,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lane_hopper_profile";

    pub fn new() -> Self {
        Self {
            version: PROFILE_VERSION,
            coins: STARTING_COINS,
            owned: BTreeSet::from([DEFAULT_SKIN.to_string()]),
            equipped: DEFAULT_SKIN.to_string(),
            weather: None,
        }
    }

    pub fn owns(&self, id: &str) -> bool {
        self.owned.contains(id)
    }

    /// Currently equipped skin, falling back to the default for stale ids
    pub fn equipped_skin(&self) -> &'static Skin {
        find_skin(&self.equipped).unwrap_or(&SKINS[0])
    }

    /// Buy a skin. Returns the remaining balance.
    pub fn buy(&mut self, id: &str) -> Result<u64, EconomyError> {
        let skin = find_skin(id).ok_or_else(|| EconomyError::UnknownSkin { id: id.to_string() })?;
        if self.owns(id) {
            return Err(EconomyError::AlreadyOwned { id: id.to_string() });
        }
        if let Err(err) = self.debit(skin.price) {
            log::warn!("Cannot buy {}: {}", id, err);
            return Err(err);
        }
        self.owned.insert(id.to_string());
        log::info!("Bought {} for {}", skin.name, skin.price);
        Ok(self.coins)
    }

    pub fn equip(&mut self, id: &str) -> Result<(), EconomyError> {
        if find_skin(id).is_none() {
            return Err(EconomyError::UnknownSkin { id: id.to_string() });
        }
        if !self.owns(id) {
            return Err(EconomyError::SkinNotOwned { id: id.to_string() });
        }
        self.equipped = id.to_string();
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let mut profile: Profile = serde_json::from_str(json)?;
        if profile.version > PROFILE_VERSION {
            return Err(ProfileError::UnsupportedVersion {
                found: profile.version,
                supported: PROFILE_VERSION,
            });
        }
        // The default skin can never be lost
        profile.owned.insert(DEFAULT_SKIN.to_string());
        if !profile.owns(&profile.equipped) {
            profile.equipped = DEFAULT_SKIN.to_string();
        }
        profile.version = PROFILE_VERSION;
        Ok(profile)
    }

    /// Load the profile from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(profile) => {
                        log::info!("Loaded profile ({} coins)", profile.coins);
                        return profile;
                    }
                    Err(err) => log::warn!("Discarding unreadable profile: {}", err),
                }
            }
        }

        log::info!("No profile found, starting fresh");
        Self::new()
    }

    /// Save the profile to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                }
                Err(err) => log::warn!("Profile not saved: {}", err),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl Wallet for Profile {
    fn balance(&self) -> u64 {
        self.coins
    }

    fn credit(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    fn debit(&mut self, amount: u64) -> Result<(), EconomyError> {
        if amount > self.coins {
            return Err(EconomyError::InsufficientFunds {
                needed: amount,
                available: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }
}
