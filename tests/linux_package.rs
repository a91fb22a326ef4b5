mod common;

use common::{Project, unpack_tar_gz};
use jpack::bundler::{CopyResource, Error, Packer, Platform};

#[tokio::test]
async fn linux_package_contains_layout_and_rendered_scripts() {
    let project = Project::new();
    let info = project
        .builder()
        .platforms(vec![Platform::Linux])
        .build()
        .unwrap();

    let report = Packer::new(info).unwrap().pack().await;
    assert!(report.is_success());
    let outcome = report.outcome(Platform::Linux).unwrap();
    assert!(outcome.is_clean(), "errors: {:?}", outcome.errors());

    let archive = project.home().join("demo.tar.gz");
    assert_eq!(outcome.artifact().unwrap().path(), Some(archive.as_path()));
    assert!(!project.home().join("linux").exists());

    let extracted = project.path().join("extracted");
    unpack_tar_gz(&archive, &extracted);
    for dir in ["bin", "docs", "logs"] {
        assert!(extracted.join(dir).is_dir(), "{dir} missing");
    }
    assert!(extracted.join("demo-1.0.0.jar").is_file());
    assert!(extracted.join("README.md").is_file());

    let start = std::fs::read_to_string(extracted.join("bin/start.sh")).unwrap();
    assert!(start.contains("-Xmx512m"));
    assert!(start.contains("--port=8080"));
    assert!(start.contains("demo-1.0.0.jar"));
    assert!(start.contains("APP_NAME=\"demo\""));
    for script in ["stop.sh", "restart.sh"] {
        assert!(extracted.join("bin").join(script).is_file());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(extracted.join("bin/start.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[tokio::test]
async fn unset_options_render_as_empty_strings() {
    let project = Project::new();
    let info = jpack::bundler::PackInfoBuilder::new()
        .artifact_id("demo")
        .version("1.0.0")
        .target_dir(project.target())
        .platforms(vec![Platform::Linux])
        .build()
        .unwrap();

    let report = Packer::new(info).unwrap().pack().await;
    assert!(report.is_success());

    let extracted = project.path().join("extracted");
    unpack_tar_gz(&project.home().join("demo.tar.gz"), &extracted);
    let start = std::fs::read_to_string(extracted.join("bin/start.sh")).unwrap();
    assert!(!start.contains("{{vmOptions}}"));
    assert!(!start.contains("{{programArgs}}"));
    assert!(start.contains("nohup java  -jar"));
}

#[tokio::test]
async fn packing_twice_recreates_the_working_directory() {
    let project = Project::new();
    let info = project
        .builder()
        .platforms(vec![Platform::Linux])
        .build()
        .unwrap();
    let packer = Packer::new(info).unwrap();

    let first = packer.pack().await;
    assert!(first.is_success());
    let second = packer.pack().await;
    assert!(second.is_success());
    assert!(second.outcome(Platform::Linux).unwrap().is_clean());
}

#[tokio::test]
async fn invalid_resource_is_recorded_and_the_rest_are_copied() {
    let project = Project::new();
    let info = project
        .builder()
        .platforms(vec![Platform::Linux])
        .copy_resources(vec![
            CopyResource::new(project.file("conf/app.yml"), "config"),
            CopyResource::new(project.file("conf/missing.yml"), "config"),
            CopyResource::new(project.file("conf/extra"), "config"),
        ])
        .build()
        .unwrap();

    let report = Packer::new(info).unwrap().pack().await;
    let outcome = report.outcome(Platform::Linux).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.errors().len(), 1);
    assert!(matches!(outcome.errors()[0], Error::ResourceCopyFailure { .. }));

    let extracted = project.path().join("extracted");
    unpack_tar_gz(&project.home().join("demo.tar.gz"), &extracted);
    assert!(extracted.join("config/app.yml").is_file());
    assert!(extracted.join("config/extra/log.xml").is_file());
    assert!(!extracted.join("config/missing.yml").exists());
}

#[tokio::test]
async fn remote_resource_is_fetched_into_its_directory() {
    let mut server = mockito::Server::new_async().await;
    let logo = server
        .mock("GET", "/assets/logo.png")
        .with_status(200)
        .with_body("png-bytes")
        .create_async()
        .await;

    let project = Project::new();
    let info = project
        .builder()
        .platforms(vec![Platform::Linux])
        .copy_resource(CopyResource::new(
            format!("{}/assets/logo.png", server.url()),
            "assets/",
        ))
        .build()
        .unwrap();

    let report = Packer::new(info).unwrap().pack().await;
    assert!(report.outcome(Platform::Linux).unwrap().is_clean());
    logo.assert_async().await;

    let extracted = project.path().join("extracted");
    unpack_tar_gz(&project.home().join("demo.tar.gz"), &extracted);
    assert_eq!(
        std::fs::read_to_string(extracted.join("assets/logo.png")).unwrap(),
        "png-bytes"
    );
}

#[tokio::test]
async fn failed_download_is_recorded() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/assets/logo.png")
        .with_status(404)
        .create_async()
        .await;

    let project = Project::new();
    let info = project
        .builder()
        .platforms(vec![Platform::Linux])
        .copy_resource(CopyResource::new(
            format!("{}/assets/logo.png", server.url()),
            "assets",
        ))
        .build()
        .unwrap();

    let report = Packer::new(info).unwrap().pack().await;
    let outcome = report.outcome(Platform::Linux).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.errors().len(), 1);
}

#[tokio::test]
async fn template_override_dir_wins() {
    let project = Project::new();
    let templates = project.path().join("templates/linux/bin");
    std::fs::create_dir_all(&templates).unwrap();
    std::fs::write(templates.join("start.sh"), "#!/bin/sh\n# custom {{name}} {{unknownKey}}\n").unwrap();

    let info = project
        .builder()
        .platforms(vec![Platform::Linux])
        .templates_dir(project.path().join("templates"))
        .build()
        .unwrap();

    let report = Packer::new(info).unwrap().pack().await;
    assert!(report.is_success());

    let extracted = project.path().join("extracted");
    unpack_tar_gz(&project.home().join("demo.tar.gz"), &extracted);
    let start = std::fs::read_to_string(extracted.join("bin/start.sh")).unwrap();
    assert_eq!(start, "#!/bin/sh\n# custom demo {{unknownKey}}\n");
}
