//! Complete workflow demonstration for voronoi_maze
//!
//! Usage: `cargo run --example maze_demo -- [seed] [out.svg]`

use std::fmt::Write as _;
use voronoi_maze::*;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let seed = args.next().unwrap_or_else(|| "abc".to_string());
    let svg_path = args.next();

    println!("=== voronoi_maze Complete Demo ===\n");

    // Step 1: Configure maze
    println!("Step 1: Configuring maze...");
    let config = MazeConfigBuilder::new()
        .seed(seed.trim())
        .cell_count(300)?
        .domain_size(800.0)?
        .relaxation_iterations(2)
        .build()?;

    println!("  Seed: {:?}", config.seed);
    println!("  Cells: {}", config.cell_count);
    println!("  Domain: {0} x {0}", config.domain_size);

    // Step 2: Generate maze
    println!("\nStep 2: Generating maze...");
    let mut state = MazeState::new(&config)?;
    let maze = state.maze();
    println!("  Generated {} cells", maze.cell_count());
    println!("  Opened {} passages", maze.passages().len());
    println!("  Start: cell {}  End: cell {}", maze.start_id(), maze.end_id());

    // Step 3: Query spatial index
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 3: Spatial queries:");
        let center = DVec2::splat(config.domain_size / 2.0);
        let cell_id = maze.find_cell_at(center);
        if let Some(cell) = maze.get_cell(cell_id) {
            println!("  Position {:?} -> Cell {}", center, cell_id);
            println!("  Cell has {} neighbors", cell.neighbor_count());
        }
    }

    // Step 4: Solve
    println!("\nStep 4: Solving...");
    let solution = state.solve().clone();
    println!("  Path length: {} cells", solution.len());
    for step in [0, solution.len() / 2, solution.len()] {
        let points = solution.polyline_until(step).len();
        println!("  Step {:>3}: {} polyline points", step, points);
    }

    // Step 5: Generate mesh
    println!("\nStep 5: Generating mesh...");
    let maze = state.maze();
    let mesh = generate_mesh(maze);
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    println!("  Closed walls: {}", closed_walls(maze).len());

    if let Some(path) = svg_path {
        let svg = render_svg(maze, &solution);
        if let Err(err) = std::fs::write(&path, svg) {
            eprintln!("  Could not write {}: {}", path, err);
        } else {
            println!("  Wrote {}", path);
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}

/// Draw closed walls, the domain border and the solution route
fn render_svg(maze: &Maze, solution: &Solution) -> String {
    let size = maze.domain_size();
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(
        svg,
        r##"<rect width="{size}" height="{size}" fill="#fff" stroke="#222" stroke-width="2"/>"##
    );

    for (id, color) in [(maze.start_id(), "#7c7"), (maze.end_id(), "#c77")] {
        if let Some(cell) = maze.get_cell(id) {
            let points: Vec<String> = cell
                .polygon
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect();
            let _ = writeln!(
                svg,
                r#"<polygon points="{}" fill="{}"/>"#,
                points.join(" "),
                color
            );
        }
    }

    for wall in closed_walls(maze) {
        let _ = writeln!(
            svg,
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#222" stroke-width="2"/>"##,
            wall.start.x, wall.start.y, wall.end.x, wall.end.y
        );
    }

    let route: Vec<String> = solution
        .polyline()
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect();
    let _ = writeln!(
        svg,
        r##"<polyline points="{}" fill="none" stroke="#36c" stroke-width="3"/>"##,
        route.join(" ")
    );

    svg.push_str("</svg>\n");
    svg
}
