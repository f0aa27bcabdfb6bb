use glam::Vec3;

// === Terrain enums ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainType {
    Mountain,
    Grass,
    Sand,
    Permafrost,
    Water,
}

impl TerrainType {
    pub fn is_land(self) -> bool {
        matches!(self, TerrainType::Grass | TerrainType::Sand | TerrainType::Permafrost)
    }

    pub fn is_water(self) -> bool {
        matches!(self, TerrainType::Water)
    }

    pub fn name(self) -> &'static str {
        match self {
            TerrainType::Mountain => "Mountain",
            TerrainType::Grass => "Grass",
            TerrainType::Sand => "Sand",
            TerrainType::Permafrost => "Snow",
            TerrainType::Water => "Water",
        }
    }

    pub fn base_yield(self) -> Yield {
        match self {
            TerrainType::Mountain => Yield::new(-100, -100, -100),
            TerrainType::Grass => Yield::new(1, 0, 0),
            TerrainType::Sand => Yield::new(-1, 0, 0),
            TerrainType::Permafrost => Yield::new(0, 0, 0),
            TerrainType::Water => Yield::new(1, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainShape {
    Flat,
    Hill,
    Mountain,
    Coast,
    Ocean,
    Ice,
}

impl TerrainShape {
    pub fn compatible_with(self, terrain_type: TerrainType) -> bool {
        match self {
            TerrainShape::Flat | TerrainShape::Hill => terrain_type.is_land(),
            TerrainShape::Mountain => terrain_type == TerrainType::Mountain,
            TerrainShape::Coast | TerrainShape::Ocean | TerrainShape::Ice => {
                terrain_type.is_water()
            }
        }
    }

    pub fn base_yield(self) -> Yield {
        match self {
            TerrainShape::Flat => Yield::new(1, 0, 0),
            TerrainShape::Hill => Yield::new(0, 1, 0),
            TerrainShape::Coast => Yield::new(0, 0, 1),
            TerrainShape::Mountain | TerrainShape::Ocean | TerrainShape::Ice => {
                Yield::new(0, 0, 0)
            }
        }
    }

    /// Movement points required to enter a tile of this shape. Mountains
    /// are effectively impassable.
    pub fn base_movement(self) -> u32 {
        match self {
            TerrainShape::Hill => 2,
            TerrainShape::Mountain => 100,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainMajorFeature {
    None,
    Forest,
    Rainforest,
}

impl TerrainMajorFeature {
    pub fn compatible_with(self, terrain_type: TerrainType, shape: TerrainShape) -> bool {
        match self {
            TerrainMajorFeature::None => true,
            TerrainMajorFeature::Forest => {
                shape == TerrainShape::Flat && terrain_type.is_land()
            }
            TerrainMajorFeature::Rainforest => {
                shape == TerrainShape::Flat && terrain_type == TerrainType::Grass
            }
        }
    }

    pub fn base_yield(self) -> Yield {
        match self {
            TerrainMajorFeature::None => Yield::new(0, 0, 0),
            TerrainMajorFeature::Forest | TerrainMajorFeature::Rainforest => Yield::new(1, 1, 0),
        }
    }

    /// Extra movement cost on top of the shape's base movement.
    pub fn movement_cost(self) -> u32 {
        match self {
            TerrainMajorFeature::None => 0,
            TerrainMajorFeature::Forest | TerrainMajorFeature::Rainforest => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainMinorFeature {
    River,
}

impl TerrainMinorFeature {
    pub fn compatible_with(self, terrain_type: TerrainType, shape: TerrainShape) -> bool {
        match self {
            TerrainMinorFeature::River => {
                terrain_type.is_land()
                    && matches!(shape, TerrainShape::Flat | TerrainShape::Hill)
            }
        }
    }
}

// === Yields ===

/// Base output of a terrain component, before any improvements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Yield {
    pub food: i32,
    pub production: i32,
    pub gold: i32,
}

impl Yield {
    pub const fn new(food: i32, production: i32, gold: i32) -> Self {
        Yield {
            food,
            production,
            gold,
        }
    }

    pub fn plus(self, other: Yield) -> Yield {
        Yield {
            food: self.food + other.food,
            production: self.production + other.production,
            gold: self.gold + other.gold,
        }
    }
}

// === Terrain ===

/// A validated terrain assignment. Construction fails when the components
/// contradict each other, e.g. an ocean shape on a land type.
#[derive(Debug, Clone, PartialEq)]
pub struct GenTerrain {
    pub terrain_type: TerrainType,
    pub shape: TerrainShape,
    pub major_feature: TerrainMajorFeature,
    pub minor_features: Vec<TerrainMinorFeature>,
}

impl GenTerrain {
    pub fn new(
        terrain_type: TerrainType,
        shape: TerrainShape,
        major_feature: TerrainMajorFeature,
        minor_features: Vec<TerrainMinorFeature>,
    ) -> Result<Self, String> {
        if !shape.compatible_with(terrain_type) {
            return Err(format!(
                "Shape {:?} is not compatible with type {:?}",
                shape, terrain_type
            ));
        }
        if !major_feature.compatible_with(terrain_type, shape) {
            return Err(format!(
                "Feature {:?} is not compatible with {:?} {:?}",
                major_feature, terrain_type, shape
            ));
        }
        for feature in &minor_features {
            if !feature.compatible_with(terrain_type, shape) {
                return Err(format!(
                    "Feature {:?} is not compatible with {:?} {:?}",
                    feature, terrain_type, shape
                ));
            }
        }
        Ok(GenTerrain {
            terrain_type,
            shape,
            major_feature,
            minor_features,
        })
    }

    pub fn has_river(&self) -> bool {
        self.minor_features.contains(&TerrainMinorFeature::River)
    }

    pub fn total_yield(&self) -> Yield {
        self.terrain_type
            .base_yield()
            .plus(self.shape.base_yield())
            .plus(self.major_feature.base_yield())
    }

    pub fn movement_cost(&self) -> u32 {
        self.shape.base_movement() + self.major_feature.movement_cost()
    }
}

// === Geometry ===

/// Render-ready polygon of a tile: vertices in canonical winding order,
/// with the outward surface normal.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePolygon {
    pub center: Vec3,
    pub vertices: Vec<Vec3>,
    pub normal: Vec3,
}

// === Tile ===

/// A finished world tile.
///
/// `neighbors[i]` shares the polygon edge from `vertices[i]` to
/// `vertices[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub id: u32,
    pub polygon: TilePolygon,
    pub neighbors: Vec<u32>,
    pub terrain: GenTerrain,
    pub elevation: f32,
    pub heat: f32,
    pub moisture: f32,
}
