//! Example snippets offered in the editor.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Snippet {
    pub label: &'static str,
    pub code: &'static str,
}

pub const BASIC: Snippet = Snippet {
    label: "basic",
    code: r#"-- Welcome to the Teal playground!
--
-- Teal is a typed dialect of Lua. Type annotations go after a colon,
-- and the compiler checks them before emitting plain Lua.

local function greet(name: string): string
   return "Hello, " .. name .. "!"
end

local count: number = 3

for i = 1, count do
   print(greet("Teal #" .. tostring(i)))
end
"#,
};

pub const ENUMS: Snippet = Snippet {
    label: "enums",
    code: r#"-- Enums are a restricted type of string value, which
-- represent a common practice in Lua code: using
-- a limited set of string constants to describe an
-- enumeration of possible values.

local Direction = enum
   "north"
   "south"
   "east"
   "west"
end"#,
};

pub const GENERICS: Snippet = Snippet {
    label: "generics",
    code: r#"-- Teal supports a simple form of generics that is
-- useful enough for dealing collections and algorithms that
-- operate over abstract data types. You can use type
-- variables wherever a type is used, and you can declare them
-- in both functions and records. Here's an example of a
-- generic function:

local function keys<K,V>(xs: {K:V}):{K}
  local ks = {}
  for k, v in pairs(xs) do
    table.insert(ks, k)
  end
  return ks
end

local s = keys({ a = 1, b = 2 }) -- s is {string}"#,
};

pub const MAPS: Snippet = Snippet {
    label: "maps",
    code: r#"local populations: {string:number}
local modes = { -- this is {boolean:number}
    [false] = 127,
    [true] = 230,
}
"#,
};

pub const RECORDS: Snippet = Snippet {
    label: "records",
    code: r#"-- Records are the bread and butter of Teal. A record
-- describes a table with a known set of typed fields,
-- and can carry functions that act as methods.

local record Point
   x: number
   y: number
end

function Point.new(x: number, y: number): Point
   local self: Point = setmetatable({}, { __index = Point })
   self.x = x
   self.y = y
   return self
end

function Point:move(dx: number, dy: number)
   self.x = self.x + dx
   self.y = self.y + dy
end

local p = Point.new(1, 2)
p:move(3, 4)
print(p.x, p.y)
"#,
};

/// Every snippet, in menu order.
pub const ALL: [Snippet; 5] = [BASIC, ENUMS, GENERICS, MAPS, RECORDS];

pub fn all() -> &'static [Snippet] {
    &ALL
}

pub fn get(label: &str) -> Option<Snippet> {
    ALL.iter().copied().find(|s| s.label == label)
}

/// Snippet shown when nothing was saved.
pub fn default_snippet() -> Snippet {
    BASIC
}

pub fn labels() -> impl Iterator<Item = &'static str> {
    ALL.iter().map(|s| s.label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup() {
        assert_eq!(get("maps"), Some(MAPS));
        assert_eq!(get("nope"), None);
        assert_eq!(default_snippet().label, "basic");
    }

    #[test]
    fn test_labels_unique_and_ordered() {
        let labels: Vec<_> = labels().collect();
        assert_eq!(labels, vec!["basic", "enums", "generics", "maps", "records"]);
    }

    #[test]
    fn test_no_empty_snippet() {
        assert!(all().iter().all(|s| !s.code.trim().is_empty()));
    }
}
