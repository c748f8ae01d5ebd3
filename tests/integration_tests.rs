use pretty_assertions::assert_eq;
use std::fs::read_to_string as read;
use terraforge::{raw, Block, BlockArgs, Document, Error, Value};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn main_document() -> Document {
    let mut doc = Document::new();

    doc.add_required_provider("aws", "hashicorp/aws", "~> 5.0")
        .add_required_provider("random", "hashicorp/random", "~> 3.6");

    doc.add_provider(
        "aws",
        BlockArgs::new().value("region", raw("var.region")).block(
            "default_tags",
            BlockArgs::new().value(
                "tags",
                Value::from_iter([("Environment", "prod"), ("Team", "platform")]),
            ),
        ),
    );

    doc.add_variable(
        "region",
        BlockArgs::new()
            .value("type", raw("string"))
            .value("description", "AWS region to deploy into")
            .value("default", "us-east-1"),
    );

    doc.add_variable(
        "zones",
        BlockArgs::new()
            .value("type", raw("list(string)"))
            .value("default", vec!["us-east-1a", "us-east-1b"]),
    );

    doc.add_resource(
        "aws_instance",
        "web",
        BlockArgs::new()
            .value("tags", Value::from_iter([("Name", "web"), ("kubernetes.io/role", "node")]))
            .value("monitoring", true)
            .value("instance_type", raw("var.instance_type"))
            .value("count", 2)
            .value("ami", "ami-123")
            .block(
                "root_block_device",
                BlockArgs::new()
                    .value("volume_size", 20)
                    .value("encrypted", true),
            )
            .block(
                "lifecycle",
                BlockArgs::new().value("ignore_changes", vec![raw("tags")]),
            ),
    );

    doc.add_module(
        "vpc",
        BlockArgs::new()
            .value("source", "terraform-aws-modules/vpc/aws")
            .value("version", "5.8.1")
            .value("cidr", "10.0.0.0/16")
            .value("azs", raw("var.zones")),
    );

    doc
}

#[test]
fn render_document() {
    init_logger();

    let mut buf = Vec::new();
    main_document().to_writer(&mut buf).unwrap();

    assert_eq!(
        String::from_utf8(buf).unwrap(),
        read("tests/fixtures/main.tf").unwrap()
    );
}

#[test]
fn render_is_repeatable() {
    let doc = main_document();

    assert_eq!(doc.render().unwrap(), doc.render().unwrap());
}

#[test]
fn save_document() {
    init_logger();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.tf");

    main_document().save(&path).unwrap();

    assert_eq!(read(&path).unwrap(), read("tests/fixtures/main.tf").unwrap());
}

#[test]
fn save_replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.tf");
    std::fs::write(&path, "stale content that is longer than the new document").unwrap();

    let mut doc = Document::new();
    doc.add_block(Block::empty("terraform"));
    doc.save(&path).unwrap();

    assert_eq!(read(&path).unwrap(), "terraform {\n}\n");
}

#[test]
fn save_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.tf");

    Document::new().save(&path).unwrap();

    assert_eq!(read(&path).unwrap(), "");
}

#[test]
fn save_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("main.tf");

    let err = main_document().save(&path).unwrap_err();

    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn save_unsupported_value_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.tf");
    std::fs::write(&path, "# keep me\n").unwrap();

    let mut doc = main_document();
    doc.add_variable("ratio", BlockArgs::new().value("default", f64::INFINITY));

    let err = doc.save(&path).unwrap_err();

    assert!(matches!(err, Error::UnsupportedValue { .. }));
    assert_eq!(
        err.to_string(),
        "unsupported value of kind `non-finite float` at `variable.ratio.default`"
    );
    assert_eq!(read(&path).unwrap(), "# keep me\n");
}

#[test]
fn nested_block_args_become_blocks() {
    let mut doc = Document::new();
    doc.add_resource(
        "aws_instance",
        "web",
        BlockArgs::new()
            .value("ami", "ami-123")
            .block("tags", BlockArgs::new().value("Name", "web")),
    );

    let expected = r#"resource "aws_instance" "web" {
  ami = "ami-123"

  tags {
    Name = "web"
  }
}"#;

    assert_eq!(doc.render().unwrap(), expected);

    let resource = &doc.blocks()[0];
    assert!(resource.attribute("tags").is_none());
    assert_eq!(resource.blocks().len(), 1);
    assert_eq!(resource.blocks()[0].ident(), "tags");
}

#[test]
fn required_provider_across_calls() {
    let mut doc = Document::new();
    doc.add_required_provider("aws", "hashicorp/aws", "~> 4.0");
    doc.add_resource("aws_s3_bucket", "logs", BlockArgs::new());
    doc.add_required_provider("aws", "hashicorp/aws", "~> 5.0");

    let expected = r#"terraform {
  required_providers {
    aws = {
      source = "hashicorp/aws"
      version = "~> 5.0"
    }
  }
}

resource "aws_s3_bucket" "logs" {
}"#;

    assert_eq!(doc.render().unwrap(), expected);
}

#[test]
fn try_set_attribute_from_serializable() {
    #[derive(serde::Serialize)]
    struct Ingress {
        from_port: u16,
        to_port: u16,
        protocol: &'static str,
        cidr_blocks: Vec<&'static str>,
    }

    let mut group = Block::new(
        "resource",
        ["aws_security_group", "web"],
        BlockArgs::new().value("name", "web"),
    );

    group
        .try_set_attribute(
            "ingress",
            &[Ingress {
                from_port: 443,
                to_port: 443,
                protocol: "tcp",
                cidr_blocks: vec!["0.0.0.0/0"],
            }],
        )
        .unwrap();

    let expected = r#"resource "aws_security_group" "web" {
  ingress = [
    {
      from_port = 443
      to_port = 443
      protocol = "tcp"
      cidr_blocks = [
        "0.0.0.0/0",
      ]
    },
  ]
  name = "web"
}"#;

    assert_eq!(group.render(0).unwrap(), expected);
}
