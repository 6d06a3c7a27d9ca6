#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use rust_decimal::Decimal;
use storefront::{
    catalog::AnyProduct,
    config::AppConfig,
    entities::catalog::CategoryModel,
    entities::commerce::CustomerModel,
    media::ImageUpload,
    services::{
        commerce::{CategoryInput, CustomerInput, NotebookSpecs, ProductInput, SmartphoneSpecs},
        AppServices,
    },
    AppState,
};
use tempfile::TempDir;

/// Application state over a migrated SQLite file and a media directory, both
/// inside a temporary directory that lives as long as the harness.
pub struct TestApp {
    pub state: AppState,
    dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let db_path = dir.path().join("storefront_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            dir.path().join("media").display().to_string(),
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let state = AppState::from_config(cfg)
            .await
            .expect("failed to build test state");

        Self { state, dir }
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    pub fn media_root(&self) -> PathBuf {
        self.dir.path().join("media")
    }

    /// Names of the files currently in the media root.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match std::fs::read_dir(self.media_root()) {
            Ok(entries) => entries
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    pub async fn category(&self, name: &str, slug: &str) -> CategoryModel {
        self.services()
            .categories
            .create(CategoryInput::new(name, slug))
            .await
            .expect("failed to create category")
    }

    pub async fn customer(&self, user_id: i64) -> CustomerModel {
        self.services()
            .customers
            .create(CustomerInput {
                user_id,
                phone: "+7 900 123-45-67".to_string(),
                address: "Lenina 1".to_string(),
            })
            .await
            .expect("failed to create customer")
    }

    pub async fn notebook(&self, category_id: i32, slug: &str, price: Decimal) -> AnyProduct {
        self.services()
            .products
            .create_notebook(
                product_input(category_id, slug, price),
                notebook_specs(),
                upload(&format!("{slug}.png"), 320, 180),
            )
            .await
            .expect("failed to create notebook")
    }

    pub async fn smartphone(&self, category_id: i32, slug: &str, price: Decimal) -> AnyProduct {
        self.services()
            .products
            .create_smartphone(
                product_input(category_id, slug, price),
                smartphone_specs(),
                upload(&format!("{slug}.png"), 180, 320),
            )
            .await
            .expect("failed to create smartphone")
    }
}

pub fn product_input(category_id: i32, slug: &str, price: Decimal) -> ProductInput {
    ProductInput {
        category_id,
        title: format!("Title {slug}"),
        slug: slug.to_string(),
        description: Some("Test product".to_string()),
        price,
    }
}

pub fn notebook_specs() -> NotebookSpecs {
    NotebookSpecs {
        diagonal: "15.6".to_string(),
        display_type: "IPS".to_string(),
        processor_freq: "3.4 GHz".to_string(),
        ram: "16 GB".to_string(),
        video: "GeForce RTX 3050".to_string(),
        time_without_charge: "10 h".to_string(),
    }
}

pub fn smartphone_specs() -> SmartphoneSpecs {
    SmartphoneSpecs {
        diagonal: "6.5".to_string(),
        display_type: "AMOLED".to_string(),
        resolution: "2400x1080".to_string(),
        accum_volume: "4500 mAh".to_string(),
        ram: "8 GB".to_string(),
        sd: true,
        sd_volume_max: "1 TB".to_string(),
        main_cam_mp: "64".to_string(),
        frontal_cam_mp: "32".to_string(),
    }
}

/// PNG bytes of a solid, half-transparent image.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 90, 128]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("failed to encode png fixture");
    out.into_inner()
}

pub fn upload(file_name: &str, width: u32, height: u32) -> ImageUpload {
    ImageUpload::new(file_name, png(width, height))
}
