//
//  Copyright (C) 2022-2024  Chase Ruskin
//
//  This program is free software: you can redistribute it and/or modify
//  it under the terms of the GNU General Public License as published by
//  the Free Software Foundation, either version 3 of the License, or
//  (at your option) any later version.
//
//  This program is distributed in the hope that it will be useful,
//  but WITHOUT ANY WARRANTY; without even the implied warranty of
//  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//  GNU General Public License for more details.
//
//  You should have received a copy of the GNU General Public License
//  along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

use std::io;
use std::io::{BufRead, Error};

/// Outputs the text `s` with a ? mark and y/N option. Only 'y' or 'yes' returns
/// `true`; an empty line or the end of input returns `false`.
pub fn prompt(s: &str) -> Result<bool, Error> {
    eprintln!("{}? [y/N]", s);
    check_for_response(&mut io::stdin().lock())
}

/// Loops until a valid response is entered, ignoring case and windows-style line endings.
fn check_for_response(input: &mut impl BufRead) -> Result<bool, Error> {
    let mut buffer: String = String::new();
    loop {
        buffer.clear();
        if input.read_line(&mut buffer)? == 0 {
            break Ok(false);
        }
        match buffer.trim_end_matches(['\r', '\n']).to_lowercase().as_ref() {
            "y" | "yes" => break Ok(true),
            "" | "n" | "no" => break Ok(false),
            _ => eprintln!("must answer yes (y) or no (n)"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn example_input_to_output() {
        assert_eq!(check_for_response(&mut "y\n".as_bytes()).unwrap(), true);
        assert_eq!(check_for_response(&mut "YES\n".as_bytes()).unwrap(), true);
        assert_eq!(check_for_response(&mut "n\n".as_bytes()).unwrap(), false);
        assert_eq!(check_for_response(&mut "\n".as_bytes()).unwrap(), false);
        assert_eq!(check_for_response(&mut "".as_bytes()).unwrap(), false);
        // invalid answers are asked again
        assert_eq!(check_for_response(&mut "maybe\ny\n".as_bytes()).unwrap(), true);
    }

    #[test]
    fn windows_style() {
        assert_eq!(check_for_response(&mut "y\r\n".as_bytes()).unwrap(), true);
        assert_eq!(check_for_response(&mut "\r\n".as_bytes()).unwrap(), false);
    }
}
