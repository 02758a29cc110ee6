//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example inspect_scene -- assets/character.json

use std::env;

use skinbind_core::{classify, load_scene};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_scene <path-to-scene.json>");
        return;
    }

    let path = &args[1];
    println!("Loading scene: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Skeletons: {}", scene.skeleton_count());
            println!("Meshes: {}", scene.mesh_count());

            for skeleton in &scene.skeletons {
                println!(
                    "  {} - {} bones, roots {:?}, IK bones {:?}",
                    skeleton.name,
                    skeleton.len(),
                    skeleton.roots(),
                    skeleton.ik_bone_names()
                );
            }

            for mesh in &scene.meshes {
                println!(
                    "  {} - {} vertices, {} weight groups",
                    mesh.name,
                    mesh.vertex_count,
                    mesh.group_count()
                );
            }

            let roles = classify(&scene.meshes).names(&scene.meshes);
            println!("\nSource: {:?}", roles.source);
            println!("Targets: {:?}", roles.targets);
            println!("Already rigged: {:?}", roles.already_rigged);
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
