//! Basic example of using the maze engine

use maze_core::{Cell, Maze, MazeConfig, MazeGenerator, Openings, Pos};

fn print_grid(maze: &Maze) {
    let grid = maze.grid();
    for row in 1..grid.rows() - 1 {
        let line: String = (1..grid.cols() - 1)
            .map(|col| match grid.get(Pos::new(row, col)) {
                Cell::Wall => '#',
                Cell::Solved => '*',
                Cell::Tried => '.',
                _ => ' ',
            })
            .collect();
        println!("{line}");
    }
}

fn main() -> maze_core::Result<()> {
    // Generate a maze with a long enough solution
    println!("Generating a 20x40 maze...\n");
    let config = MazeConfig {
        task_budget: 4,
        min_path_length: 81,
        ..MazeConfig::medium().with_seed(7)
    };
    let generator = MazeGenerator::new(config)?;
    let report = generator.generate()?;
    print_grid(generator.maze());

    println!("\nAttempts: {}", report.attempts);
    println!("Seed: {}", report.seed);
    println!("Corridors carved: {}", report.carve.corridors);
    println!("Openings moved to corners: {}", report.wall_pushes);
    println!(
        "Entrance above column {}, exit below column {}",
        report.openings.entrance, report.openings.exit
    );
    println!(
        "Solution: {} cells, {} turns",
        report.solution.path_length, report.solution.turn_count
    );

    // Presets only fix the size and lookahead
    let small = MazeConfig::small();
    println!("\nSmall preset: {}x{} rooms, depth {}", small.height, small.width, small.depth);
    let report = MazeGenerator::new(small)?.generate()?;
    println!("Solution: {} cells", report.solution.path_length);

    // Drive the phases by hand and pick the openings ourselves
    println!("\n--- Solving a hand-picked opening pair ---\n");
    let maze = Maze::new(6, 8, 99)?;
    maze.carve(0, 0)?;
    maze.normalize_openings();
    maze.set_openings(Openings::new(0, 7))?;
    match maze.solve(2) {
        Some(metrics) => {
            print_grid(&maze);
            println!("\nSolution: {} cells, {} turns", metrics.path_length, metrics.turn_count);
        }
        None => println!("No route between the chosen openings"),
    }

    Ok(())
}
