//! Texture handles used by the game

use platform_engine::render::{TextureHandle, TextureRegistry};

/// First, middle and last tile of a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripTiles {
    /// Left or top end
    pub first: TextureHandle,
    /// Repeated interior tile
    pub middle: TextureHandle,
    /// Right or bottom end
    pub last: TextureHandle,
}

impl StripTiles {
    /// Tile for position `index` in a strip of `length` tiles
    pub fn for_index(&self, index: usize, length: usize) -> TextureHandle {
        if index == 0 {
            self.first
        } else if index + 1 == length {
            self.last
        } else {
            self.middle
        }
    }
}

/// Every texture the level and characters draw with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameTextures {
    /// Horizontal platform tiles
    pub ground: StripTiles,
    /// Vertical column tiles
    pub column: StripTiles,
    /// Regular crate
    pub crate_box: TextureHandle,
    /// Special crate
    pub crate_special: TextureHandle,
    /// Player character
    pub player: TextureHandle,
    /// Enemy character
    pub enemy: TextureHandle,
    /// Projectile
    pub bullet: TextureHandle,
}

impl GameTextures {
    /// Acquire handles for every game texture
    pub fn acquire(registry: &mut TextureRegistry) -> Self {
        Self {
            ground: StripTiles {
                first: registry.acquire("tiles/tile_0001"),
                middle: registry.acquire("tiles/tile_0002"),
                last: registry.acquire("tiles/tile_0003"),
            },
            column: StripTiles {
                first: registry.acquire("tiles/tile_0020"),
                middle: registry.acquire("tiles/tile_0120"),
                last: registry.acquire("tiles/tile_0140"),
            },
            crate_box: registry.acquire("tiles/tile_0009"),
            crate_special: registry.acquire("tiles/tile_0026"),
            player: registry.acquire("characters/tile_0000"),
            enemy: registry.acquire("characters/tile_0002"),
            bullet: registry.acquire("tiles/tile_0151"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_end_tiles() {
        let tiles = StripTiles {
            first: TextureHandle(1),
            middle: TextureHandle(2),
            last: TextureHandle(3),
        };
        assert_eq!(tiles.for_index(0, 4), TextureHandle(1));
        assert_eq!(tiles.for_index(2, 4), TextureHandle(2));
        assert_eq!(tiles.for_index(3, 4), TextureHandle(3));
        assert_eq!(tiles.for_index(0, 1), TextureHandle(1));
    }

    #[test]
    fn test_acquire_is_stable() {
        let mut registry = TextureRegistry::new();
        let first = GameTextures::acquire(&mut registry);
        let count = registry.len();
        let second = GameTextures::acquire(&mut registry);
        assert_eq!(first, second);
        assert_eq!(registry.len(), count);
        assert_eq!(registry.name(first.player), Some("characters/tile_0000"));
    }
}
