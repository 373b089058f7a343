use phong_desk::{Config, scene::DeskScene};

fn main() -> anyhow::Result<()> {
    phong_desk::run(Config::from_env(), vec![DeskScene::constructor()])
}
