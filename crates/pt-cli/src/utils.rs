use core::fmt::Display;

use clap::ValueEnum;
use pt::scene::{
    mesh::RenderableHandle,
    presets::{DebugScene, MirrorBoxScene, RandomSpheresScene},
    SceneConfig, SceneT,
};

#[derive(Debug, Default, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum AvailableScene {
    #[default]
    Random,
    Debug,
    MirrorBox,
}

impl AvailableScene {
    /// Returns the handles of the meshes the scene registered
    pub fn insert_into(
        self,
        scene: &mut impl SceneT,
        config: &SceneConfig,
    ) -> pt::Result<Vec<RenderableHandle>> {
        match self {
            AvailableScene::Random => RandomSpheresScene::insert_into(scene, config)?,
            AvailableScene::Debug => DebugScene::insert_into(scene)?,
            AvailableScene::MirrorBox => return Ok(MirrorBoxScene::insert_into(scene)?.into()),
        }
        Ok(Vec::new())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::str::FromStr for Dimensions {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let Some((a, b)) = s.split_once('x') else {
            return Err(anyhow::anyhow!("Incorrect format, expected `width`x`height`"));
        };
        let width: u32 = a.parse()?;
        let height: u32 = b.parse()?;
        if width == 0 || height == 0 {
            return Err(anyhow::anyhow!("Dimensions must be non zero, got {s}"));
        }

        Ok(Dimensions { width, height })
    }
}

impl Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}x{}", self.width, self.height))
    }
}
