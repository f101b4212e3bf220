//! Columns of fluid that drip further down the page as it scrolls.

pub(crate) const SHADER_DRIPPING_FLUID: &str = r#"#version 300 es
precision highp float;

uniform vec2 u_resolution;
uniform float u_scroll_progr;
uniform float u_col_width;
uniform float u_seed;
uniform float u_scale;
uniform float u_time;
uniform float u_speed;
uniform float u_opacity;
uniform vec3 u_color;

in vec2 vUv;
out vec4 fragColor;

vec3 mod289(vec3 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec2 mod289(vec2 x) { return x - floor(x * (1.0 / 289.0)) * 289.0; }
vec3 permute(vec3 x) { return mod289(((x * 34.0) + 1.0) * x); }

float snoise(vec2 v) {
    const vec4 C = vec4(0.211324865405187, 0.366025403784439, -0.577350269189626, 0.024390243902439);
    vec2 i = floor(v + dot(v, C.yy));
    vec2 x0 = v - i + dot(i, C.xx);
    vec2 i1 = (x0.x > x0.y) ? vec2(1.0, 0.0) : vec2(0.0, 1.0);
    vec4 x12 = x0.xyxy + C.xxzz;
    x12.xy -= i1;
    i = mod289(i);
    vec3 p = permute(permute(i.y + vec3(0.0, i1.y, 1.0)) + i.x + vec3(0.0, i1.x, 1.0));
    vec3 m = max(0.5 - vec3(dot(x0, x0), dot(x12.xy, x12.xy), dot(x12.zw, x12.zw)), 0.0);
    m = m * m;
    m = m * m;
    vec3 x = 2.0 * fract(p * C.www) - 1.0;
    vec3 h = abs(x) - 0.5;
    vec3 ox = floor(x + 0.5);
    vec3 a0 = x - ox;
    m *= 1.79284291400159 - 0.85373472095314 * (a0 * a0 + h * h);
    vec3 g;
    g.x = a0.x * x0.x + h.x * x0.y;
    g.yz = a0.yz * x12.xz + h.yz * x12.yw;
    return 130.0 * dot(m, g);
}

float hash1(float n) {
    return fract(sin(n * 91.3458 + u_seed * 47.0) * 43758.5453);
}

void main() {
    float aspect = u_resolution.x / max(u_resolution.y, 1.0);
    float columns = floor(max(8.0 * aspect / max(u_col_width, 0.1), 1.0));
    float col = floor(vUv.x * columns);
    float across = fract(vUv.x * columns) - 0.5;
    float rnd = hash1(col);

    // Speed is quantized to 0.05 steps so the time base stays a whole
    // multiple of 0.1 rad/s.
    float t = u_time * 0.1 * max(1.0, floor(u_speed * 20.0 + 0.5));
    vec2 orbit = vec2(cos(t + rnd * 6.2831853), sin(t + rnd * 6.2831853));
    float n = snoise(vec2(col * u_scale, u_seed * 10.0) + orbit);

    float reach = 0.08 + u_scroll_progr * (0.55 + 0.35 * rnd) + 0.06 * n;
    float edge = 1.0 - clamp(reach, 0.0, 1.2);

    float width = 0.32 + 0.08 * snoise(vec2(vUv.y * 3.0, col + u_seed));
    float body = step(edge, vUv.y) * (1.0 - smoothstep(width - 0.04, width, abs(across)));

    vec2 head = vec2(across, (vUv.y - edge) * columns / aspect);
    float drop = 1.0 - smoothstep(width * 0.85, width * 1.05, length(head));

    float fluid = max(body, drop);
    float shade = 0.75 + 0.25 * smoothstep(width, 0.0, abs(across));
    fragColor = vec4(u_color * shade, fluid * u_opacity);
}
"#;
